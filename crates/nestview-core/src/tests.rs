#[cfg(test)]
mod tests {
    use crate::animation::*;
    use crate::*;
    use std::time::Duration;

    #[test]
    fn test_bounds_extents_and_contains() {
        let b = Bounds::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 10.0));
        assert_eq!(b.extents(), Vec3::new(1.0, 2.0, 5.0));
        assert!(b.contains(Vec3::new(0.5, -1.5, 4.9)));
        assert!(!b.contains(Vec3::new(0.0, 0.0, 5.1)));
    }

    #[test]
    fn test_clip_volume_from_bounds() {
        let clip = ClipVolume::from_bounds(&Bounds::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 4.0),
        ));
        assert_eq!(clip.center, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(clip.extents, Vec3::new(0.5, 0.5, 2.0));
    }

    #[test]
    fn test_vec3_normalized_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_quat_nlerp_endpoints() {
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(a.nlerp(b, 0.0).angle_to(a) < 1e-4);
        assert!(a.nlerp(b, 1.0).angle_to(b) < 1e-4);
        let mid = a.nlerp(b, 0.5);
        assert!((mid.angle_to(a) - std::f32::consts::FRAC_PI_4).abs() < 1e-3);
    }

    #[test]
    fn test_easing_ease_in_is_squared() {
        assert_eq!(Easing::EaseIn.interpolate(0.5), 0.25);
        assert_eq!(Easing::Linear.interpolate(2.0), 1.0);
    }

    #[test]
    fn test_tween_steps_and_finishes() {
        let mut t = Tween::new(
            0.0f32,
            10.0,
            AnimationSpec::tween(Duration::from_millis(1000), Easing::Linear),
        );
        assert!(t.advance(Duration::from_millis(250)));
        assert!((*t.get() - 2.5).abs() < 0.01);

        assert!(!t.advance(Duration::from_millis(750)));
        assert_eq!(*t.get(), 10.0);
        assert!(t.is_finished());
    }

    #[test]
    fn test_tween_honours_delay() {
        let spec = AnimationSpec {
            delay: Duration::from_millis(50),
            ..AnimationSpec::tween(Duration::from_millis(100), Easing::Linear)
        };
        let mut t = Tween::new(Vec3::ZERO, Vec3::ONE, spec);
        assert!(t.advance(Duration::from_millis(40)));
        assert_eq!(*t.get(), Vec3::ZERO);
        assert!(t.advance(Duration::from_millis(60)));
        assert!((t.get().x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_config_default_validates() {
        let cfg = ListConfig::default();
        assert_eq!(cfg.clip_margin, 0.001);
        assert_eq!(cfg.max_array_size, 10_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_negative_bounds() {
        let cfg = ListConfig::default()
            .with_bounds(Bounds::new(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0)));
        assert!(matches!(cfg.validate(), Err(ListError::InvalidBounds(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json_fills_defaults() {
        let cfg: ListConfig = serde_json::from_str(r#"{ "indent_step": 0.05 }"#).unwrap();
        assert_eq!(cfg.indent_step, 0.05);
        assert_eq!(cfg.clip_margin, 0.001);
    }
}
