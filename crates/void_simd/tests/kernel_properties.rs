//! Property tests for void_simd
//!
//! Every property is checked on each kernel the machine can run, so the
//! portable and vectorized paths are held to the same contract.

use approx::assert_relative_eq;
use void_simd::kernel::{self, Kernel, KernelPath, PortableKernel};
use void_simd::prelude::*;
use void_simd::{array_scale, approx_sqrt, hardware_sqrt, sphere_aabb_intersect, sphere_sphere_intersect};

/// Every kernel available on this machine
fn kernels() -> Vec<Box<dyn Kernel>> {
    let mut kernels: Vec<Box<dyn Kernel>> = vec![Box::new(PortableKernel)];
    #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if let Ok(vector) = void_simd::VectorKernel::detect() {
            kernels.push(Box::new(vector));
        }
    }
    kernels
}

fn samples() -> Vec<Vec4> {
    vec![
        Vec4::new(1.0, 2.0, 3.0, 4.0),
        Vec4::new(-0.5, 0.25, 8.0, -3.0),
        Vec4::new(100.0, -42.0, 0.001, 7.5),
        Vec4::new(0.3, 0.3, -0.9, 0.0),
    ]
}

fn sample_matrix() -> Matrix4 {
    Matrix4::from_rows([
        [1.0, 2.0, 3.0, 4.0],
        [-2.0, 0.5, 1.5, -1.0],
        [0.0, 3.0, -1.0, 2.0],
        [4.0, -0.5, 2.5, 1.0],
    ])
}

/// Normalize through one kernel with a given square root
fn normalize_with(kernel: &dyn Kernel, v: &Vec4, sqrt: fn(f32) -> f32) -> Vec4 {
    let len = sqrt(kernel.dot(v, v));
    if len > EPSILON {
        kernel.scale(v, 1.0 / len)
    } else {
        Vec4::ZERO
    }
}

/// PROPERTY: normalized vectors have unit length (hardware square root)
#[test]
fn property_normalize_unit_length() {
    for kernel in kernels() {
        for v in samples() {
            let n = normalize_with(kernel.as_ref(), &v, hardware_sqrt);
            let len = hardware_sqrt(kernel.dot(&n, &n));
            assert!((len - 1.0).abs() < 1e-4, "{:?}: |{:?}| = {}", kernel.path(), n, len);
        }
    }
}

/// PROPERTY: the one-step square root keeps normalization within 0.5%
#[test]
fn property_normalize_unit_length_approx_sqrt() {
    for kernel in kernels() {
        for v in samples() {
            let n = normalize_with(kernel.as_ref(), &v, approx_sqrt);
            let len = hardware_sqrt(kernel.dot(&n, &n));
            assert!((len - 1.0).abs() < 5e-3, "{:?}: |{:?}| = {}", kernel.path(), n, len);
        }
    }
}

/// PROPERTY: the public normalize has unit length within the active
/// kernel's square-root accuracy
#[test]
fn property_public_normalize_unit_length() {
    let tolerance = match kernel::active().path() {
        KernelPath::Vectorized => 1e-4,
        KernelPath::Portable => 5e-3,
    };
    for v in samples() {
        let n4 = v.normalize();
        let len4 = hardware_sqrt(n4.dot(n4));
        assert!((len4 - 1.0).abs() < tolerance, "|{:?}| = {}", n4, len4);

        let n3 = v.truncate().normalize();
        let len3 = hardware_sqrt(n3.dot(n3));
        assert!((len3 - 1.0).abs() < tolerance, "|{:?}| = {}", n3, len3);
    }
}

/// PROPERTY: normalizing zero yields zero for every arity
#[test]
fn property_normalize_zero() {
    for kernel in kernels() {
        assert_eq!(normalize_with(kernel.as_ref(), &Vec4::ZERO, approx_sqrt), Vec4::ZERO);
    }
    assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    assert_eq!(Vec4::ZERO.normalize(), Vec4::ZERO);
}

/// PROPERTY: dot product is symmetric
#[test]
fn property_dot_symmetric() {
    for kernel in kernels() {
        for a in samples() {
            for b in samples() {
                assert_relative_eq!(kernel.dot(&a, &b), kernel.dot(&b, &a), max_relative = 1e-6);
            }
        }
    }
}

/// PROPERTY: cross product is orthogonal to both inputs
#[test]
fn property_cross_orthogonal() {
    for kernel in kernels() {
        for a in samples() {
            for b in samples() {
                let (a3, b3) = (a.truncate().extend(0.0), b.truncate().extend(0.0));
                let c = kernel.cross(&a3, &b3);
                let scale = 1.0 + kernel.dot(&a3, &a3) * kernel.dot(&b3, &b3);
                assert!(kernel.dot(&c, &a3).abs() / scale < 1e-5);
                assert!(kernel.dot(&c, &b3).abs() / scale < 1e-5);
                assert_eq!(c.w, 0.0);
            }
        }
    }
}

/// PROPERTY: identity is the two-sided identity of multiply
#[test]
fn property_identity_multiply() {
    let m = sample_matrix();
    for kernel in kernels() {
        assert_eq!(kernel.mat_mul(&Matrix4::IDENTITY, &m), m);
        assert_eq!(kernel.mat_mul(&m, &Matrix4::IDENTITY), m);
    }
}

/// PROPERTY: transpose is an involution
#[test]
fn property_transpose_involution() {
    let m = sample_matrix();
    assert_eq!(m.transpose().transpose(), m);
}

/// PROPERTY: fast inverse square root within 0.2%
#[test]
fn property_fast_inv_sqrt_accuracy() {
    for x in [1.0f32, 4.0, 100.0] {
        let exact = 1.0 / x.sqrt();
        assert_relative_eq!(fast_inv_sqrt(x), exact, max_relative = 2e-3);
    }
}

/// PROPERTY: fast sine and cosine at the reference points
#[test]
fn property_fast_trig_reference_points() {
    assert!(fast_sin(0.0).abs() < 1e-3);
    assert!((fast_cos(0.0) - 1.0).abs() < 1e-3);
    assert!((fast_sin(FRAC_PI_2) - 1.0).abs() < 1e-3);
}

/// PROPERTY: elementwise addition on known values
#[test]
fn property_vec4_add_known_values() {
    let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
    let b = Vec4::new(5.0, 6.0, 7.0, 8.0);
    for kernel in kernels() {
        assert_eq!(kernel.add(&a, &b), Vec4::new(6.0, 8.0, 10.0, 12.0));
    }
    assert_eq!(a + b, Vec4::new(6.0, 8.0, 10.0, 12.0));
}

/// PROPERTY: sphere scenarios
#[test]
fn property_sphere_scenarios() {
    let a = Sphere::new(Vec3::ZERO, 1.0);
    assert!(sphere_sphere_intersect(&a, &Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0)));
    assert!(!sphere_sphere_intersect(&a, &Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0)));

    let aabb = AABB::new(Vec3::ONE, Vec3::splat(2.0));
    assert!(sphere_aabb_intersect(&Sphere::new(Vec3::ZERO, 1.8), &aabb));
    assert!(!sphere_aabb_intersect(&Sphere::new(Vec3::ZERO, 1.7), &aabb));
}

/// PROPERTY: batch scale over five elements doubles each one
#[test]
fn property_batch_scale_five() {
    let input: Vec<Vec4> = (0..5).map(|i| Vec4::splat(i as f32 + 0.5)).collect();
    for kernel in kernels() {
        let mut out = vec![Vec4::ZERO; 5];
        kernel.batch_scale(&input, 2.0, &mut out);
        for (o, v) in out.iter().zip(&input) {
            assert_eq!(*o, Vec4::splat(v.x * 2.0));
        }
    }

    let mut out = vec![Vec4::ZERO; 5];
    array_scale(&input, 2.0, &mut out, 5).unwrap();
    assert_eq!(out[4], Vec4::splat(9.0));
}

/// PROPERTY: both paths agree on matrix and batch operations
#[test]
fn property_paths_agree() {
    let reference = PortableKernel;
    let a = sample_matrix();
    let b = a.transpose();
    let data: Vec<Vec4> = (0..9).map(|i| Vec4::new(i as f32, -(i as f32), 0.5, 2.0)).collect();

    for kernel in kernels() {
        let expected = reference.mat_mul(&a, &b).to_rows();
        let actual = kernel.mat_mul(&a, &b).to_rows();
        for (e, g) in expected.iter().flatten().zip(actual.iter().flatten()) {
            assert_relative_eq!(*e, *g, epsilon = 1e-4, max_relative = 1e-5);
        }

        for v in samples() {
            let e = reference.transform(&a, &v);
            let g = kernel.transform(&a, &v);
            for (e, g) in e.to_array().iter().zip(g.to_array().iter()) {
                assert_relative_eq!(*e, *g, epsilon = 1e-3, max_relative = 1e-5);
            }
        }

        let mut expected = vec![Vec4::ZERO; data.len()];
        let mut actual = vec![Vec4::ZERO; data.len()];
        reference.batch_add(&data, &data, &mut expected);
        kernel.batch_add(&data, &data, &mut actual);
        assert_eq!(expected, actual);
    }
}

/// PROPERTY: multiplying by the inverse yields the identity
#[test]
fn property_inverse_roundtrip() {
    let m = Matrix4::rotation_euler(0.4, -1.2, 2.0) * Matrix4::translation(3.0, -1.0, 0.5);
    let inv = m.inverse().unwrap();
    let product = (m * inv).to_rows();
    let identity = Matrix4::IDENTITY.to_rows();
    for (p, i) in product.iter().flatten().zip(identity.iter().flatten()) {
        assert!((p - i).abs() < 1e-4, "{} vs {}", p, i);
    }
    assert!(Matrix4::ZERO.inverse().is_none());
}
