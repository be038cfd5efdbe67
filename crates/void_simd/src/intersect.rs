//! Intersection tests
//!
//! Volume-volume predicates plus ray queries against spheres and boxes.
//! Touching shapes count as intersecting.

use crate::bounds::{Sphere, AABB};
use crate::fast::fast_sqrt;
use crate::ray::Ray;

/// Do two spheres overlap or touch?
#[inline]
pub fn sphere_sphere_intersect(a: &Sphere, b: &Sphere) -> bool {
    a.intersects_sphere(b)
}

/// Does a sphere overlap or touch a box?
#[inline]
pub fn sphere_aabb_intersect(sphere: &Sphere, aabb: &AABB) -> bool {
    sphere.intersects_aabb(aabb)
}

/// Ray-sphere intersection
///
/// Returns the nearest non-negative ray parameter, or `None` on a miss or
/// when the sphere lies behind the origin. From inside the sphere the exit
/// parameter is returned.
pub fn ray_sphere_intersect(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrt_d = fast_sqrt(discriminant);
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Ray-box intersection using the slab method
///
/// Returns the entry parameter, the exit parameter when the origin is
/// inside the box, or `None` on a miss. A ray running parallel to a face
/// plane hits as long as its origin lies within that slab, faces included.
pub fn ray_aabb_intersect(ray: &Ray, aabb: &AABB) -> Option<f32> {
    let origin = ray.origin.to_array();
    let dir = ray.direction.to_array();
    let min = aabb.min.to_array();
    let max = aabb.max.to_array();

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        if dir[axis] == 0.0 {
            // Parallel: the slab is either everywhere or nowhere along the ray
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir[axis];
        let t1 = (min[axis] - origin[axis]) * inv;
        let t2 = (max[axis] - origin[axis]) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    // Box behind the origin, slabs never overlap, or a zero direction
    if tmax < 0.0 || tmin > tmax || tmax == f32::INFINITY {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    #[test]
    fn test_spheres_touching() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(sphere_sphere_intersect(&a, &b));
    }

    #[test]
    fn test_spheres_apart() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(!sphere_sphere_intersect(&a, &b));
    }

    #[test]
    fn test_sphere_aabb() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        assert!(sphere_aabb_intersect(&Sphere::new(Vec3::new(2.0, 0.5, 0.5), 1.0), &aabb));
        assert!(!sphere_aabb_intersect(&Sphere::new(Vec3::new(2.5, 0.5, 0.5), 1.0), &aabb));
        // Center inside the box
        assert!(sphere_aabb_intersect(&Sphere::new(Vec3::splat(0.5), 0.1), &aabb));
    }

    #[test]
    fn test_ray_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let t = ray_sphere_intersect(&ray, &sphere).unwrap();
        assert!((ray.at(t).z - 4.0).abs() < 2e-2);
    }

    #[test]
    fn test_ray_sphere_miss_and_behind() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(ray_sphere_intersect(&ray, &Sphere::new(Vec3::new(10.0, 0.0, 5.0), 1.0)).is_none());
        assert!(ray_sphere_intersect(&ray, &Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)).is_none());
    }

    #[test]
    fn test_ray_sphere_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let t = ray_sphere_intersect(&ray, &Sphere::new(Vec3::ZERO, 5.0)).unwrap();
        assert!((ray.at(t).z - 5.0).abs() < 2e-2);
    }

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));
        let t = ray_aabb_intersect(&ray, &aabb).unwrap();
        assert!((ray.at(t).z - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));
        assert!(ray_aabb_intersect(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_inside_returns_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::ONE);
        let t = ray_aabb_intersect(&ray, &aabb).unwrap();
        assert!((ray.at(t).z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_aabb_intersect(&ray, &AABB::new(Vec3::ZERO, Vec3::ONE)).is_none());
    }

    #[test]
    fn test_ray_aabb_grazing_face() {
        // Runs along the x = -1 face
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::Z);
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));
        let t = ray_aabb_intersect(&ray, &aabb).unwrap();
        assert!((ray.at(t).z - 5.0).abs() < 1e-4);

        // Along an edge, two axes parallel
        let edge = Ray::new(Vec3::new(1.0, -1.0, 0.0), Vec3::Z);
        assert!(ray_aabb_intersect(&edge, &aabb).is_some());
    }

    #[test]
    fn test_ray_aabb_parallel_outside() {
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));
        let ray = Ray::new(Vec3::new(-1.5, 0.0, 0.0), Vec3::Z);
        assert!(ray_aabb_intersect(&ray, &aabb).is_none());
        let above = Ray::new(Vec3::new(0.0, 1.0001, 0.0), Vec3::Z);
        assert!(ray_aabb_intersect(&above, &aabb).is_none());

        let degenerate = Ray::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        assert!(ray_aabb_intersect(&degenerate, &aabb).is_none());
    }
}
