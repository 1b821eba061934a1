use std::time::Duration;

use nestview_core::{AnimationSpec, Bounds, Easing, Pose, Quat, Tween, Vec3};

/// Time an object takes to grow into place.
pub const GROW_DURATION: Duration = Duration::from_millis(500);

/// Host handle for a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view, degrees.
    pub field_of_view: f32,
}

/// What placement needs to know about the object being placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placeable {
    pub object: ObjectRef,
    pub position: Vec3,
    pub scale: Vec3,
    /// Bounds at unit scale; `None` for objects with nothing to measure.
    pub unit_bounds: Option<Bounds>,
}

impl Placeable {
    fn bounds_at(&self, scale: Vec3) -> Option<Bounds> {
        self.unit_bounds.map(|b| {
            Bounds::new(
                self.position + mul(b.center, scale),
                mul(b.size, scale),
            )
        })
    }
}

fn mul(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x * b.x, a.y * b.y, a.z * b.z)
}

/// Transform values for one placed object this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementFrame {
    pub object: ObjectRef,
    pub scale: Vec3,
    pub position: Vec3,
    pub finished: bool,
}

/// One object growing into place. Dropping it cancels the motion.
#[derive(Clone, Debug)]
pub struct PlacementTween {
    object: ObjectRef,
    scale: Tween<Vec3>,
    position: Tween<Vec3>,
}

impl PlacementTween {
    pub fn object(&self) -> ObjectRef {
        self.object
    }

    pub fn destination(&self) -> Vec3 {
        *self.position.target()
    }

    fn advance(&mut self, dt: Duration) -> PlacementFrame {
        let running = self.scale.advance(dt);
        self.position.advance(dt);
        PlacementFrame {
            object: self.object,
            scale: *self.scale.get(),
            position: *self.position.get(),
            finished: !running,
        }
    }
}

type ObjectHook = Box<dyn FnMut(ObjectRef)>;

/// Animates freshly created objects into view.
///
/// While an object moves it is taken out of the spatial index so it cannot be
/// direct-selected mid-flight; it is re-added and selected on arrival.
pub struct PlacementModule {
    /// Degrees added to the camera's half field of view when fitting objects.
    pub fov_difference: f32,
    add_to_spatial_hash: Option<ObjectHook>,
    remove_from_spatial_hash: Option<ObjectHook>,
    select: Option<ObjectHook>,
    active: Vec<PlacementTween>,
}

impl Default for PlacementModule {
    fn default() -> Self {
        Self {
            fov_difference: -10.0,
            add_to_spatial_hash: None,
            remove_from_spatial_hash: None,
            select: None,
            active: Vec::new(),
        }
    }
}

impl PlacementModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_spatial_hash_hooks(
        &mut self,
        add: impl FnMut(ObjectRef) + 'static,
        remove: impl FnMut(ObjectRef) + 'static,
    ) {
        self.add_to_spatial_hash = Some(Box::new(add));
        self.remove_from_spatial_hash = Some(Box::new(remove));
    }

    pub fn set_select(&mut self, select: impl FnMut(ObjectRef) + 'static) {
        self.select = Some(Box::new(select));
    }

    /// Start growing `obj` to `target_scale`, moving it out far enough that it
    /// fits the camera's view at that scale.
    pub fn place_object(&mut self, obj: &Placeable, target_scale: Vec3, camera: &Camera) {
        self.cancel(obj.object);
        if let Some(remove) = &mut self.remove_from_spatial_hash {
            remove(obj.object);
        }

        let Some(bounds) = obj.bounds_at(target_scale) else {
            log::debug!("{:?} has no bounds; placing without motion", obj.object);
            self.finish(obj.object);
            return;
        };

        let destination = self.fit_to_view(obj.position, &bounds, camera);
        log::info!("placing {:?}: {:?} -> {:?}", obj.object, obj.position, destination);

        let spec = AnimationSpec::tween(GROW_DURATION, Easing::EaseIn);
        self.active.push(PlacementTween {
            object: obj.object,
            scale: Tween::new(obj.scale, target_scale, spec),
            position: Tween::new(obj.position, destination, spec),
        });
    }

    fn fit_to_view(&self, position: Vec3, bounds: &Bounds, camera: &Camera) -> Vec3 {
        let perspective = camera.field_of_view * 0.5 + self.fov_difference;
        let mut forward = position - camera.position;
        forward.y = 0.0;

        let tan = perspective.to_radians().tan();
        if tan <= f32::EPSILON {
            return position;
        }
        let distance = bounds.size.length() / tan;
        if distance > forward.length() {
            camera.position + forward.normalized() * distance
        } else {
            position
        }
    }

    /// Step every active placement. Finished objects are selected and put
    /// back into the spatial index.
    pub fn update(&mut self, dt: Duration) -> Vec<PlacementFrame> {
        let frames: Vec<PlacementFrame> = self.active.iter_mut().map(|t| t.advance(dt)).collect();
        self.active.retain(|t| !t.scale.is_finished());
        for f in frames.iter().filter(|f| f.finished) {
            self.finish(f.object);
        }
        frames
    }

    fn finish(&mut self, object: ObjectRef) {
        if let Some(select) = &mut self.select {
            select(object);
        }
        if let Some(add) = &mut self.add_to_spatial_hash {
            add(object);
        }
        log::info!("placed {object:?}");
    }

    /// Drop the motion of `object` without finishing it. The object stays out
    /// of the spatial index.
    pub fn cancel(&mut self, object: ObjectRef) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.object != object);
        before != self.active.len()
    }

    pub fn active(&self) -> &[PlacementTween] {
        &self.active
    }

    /// Pull a preview pose toward `origin`; `t = 1` snaps onto it.
    pub fn preview(preview: &mut Pose, origin: &Pose, t: f32, local_rotation: Option<Quat>) {
        preview.position = preview.position.lerp(origin.position, t);
        let target = match local_rotation {
            Some(local) => origin.rotation * local,
            None => origin.rotation,
        };
        preview.rotation = preview.rotation.nlerp(target, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn camera() -> Camera {
        Camera {
            position: Vec3::ZERO,
            field_of_view: 60.0,
        }
    }

    fn recorder(module: &mut PlacementModule) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, r, s) = (log.clone(), log.clone(), log.clone());
        module.set_spatial_hash_hooks(
            move |o| a.borrow_mut().push(format!("add {}", o.0)),
            move |o| r.borrow_mut().push(format!("remove {}", o.0)),
        );
        module.set_select(move |o| s.borrow_mut().push(format!("select {}", o.0)));
        log
    }

    #[test]
    fn test_placement_grows_with_squared_progress() {
        let mut module = PlacementModule::new();
        let log = recorder(&mut module);
        let obj = Placeable {
            object: ObjectRef(7),
            position: Vec3::new(0.0, 0.0, 10.0),
            scale: Vec3::ZERO,
            unit_bounds: Some(Bounds::new(Vec3::ZERO, Vec3::ONE)),
        };
        module.place_object(&obj, Vec3::ONE, &camera());
        assert_eq!(*log.borrow(), vec!["remove 7"]);

        let frames = module.update(Duration::from_millis(250));
        assert!((frames[0].scale.x - 0.25).abs() < 1e-4);
        assert!(!frames[0].finished);

        let frames = module.update(Duration::from_millis(250));
        assert!(frames[0].finished);
        assert_eq!(frames[0].scale, Vec3::ONE);
        assert!(module.active().is_empty());
        assert_eq!(*log.borrow(), vec!["remove 7", "select 7", "add 7"]);
    }

    #[test]
    fn test_close_object_is_pushed_out_to_fit_view() {
        let mut module = PlacementModule::new();
        let obj = Placeable {
            object: ObjectRef(1),
            position: Vec3::new(0.0, 1.0, 0.5),
            scale: Vec3::ONE,
            unit_bounds: Some(Bounds::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))),
        };
        module.place_object(&obj, Vec3::ONE, &camera());

        // half fov 30 - 10 = 20 degrees; |size| = sqrt(3)
        let expected = 3f32.sqrt() / 20f32.to_radians().tan();
        let dest = module.active()[0].destination();
        assert!((dest.z - expected).abs() < 1e-3);
        assert_eq!(dest.y, 0.0);
    }

    #[test]
    fn test_far_object_stays_put() {
        let mut module = PlacementModule::new();
        let obj = Placeable {
            object: ObjectRef(1),
            position: Vec3::new(0.0, 0.0, 100.0),
            scale: Vec3::ONE,
            unit_bounds: Some(Bounds::new(Vec3::ZERO, Vec3::ONE)),
        };
        module.place_object(&obj, Vec3::ONE, &camera());
        assert_eq!(module.active()[0].destination(), obj.position);
    }

    #[test]
    fn test_unbounded_object_finishes_immediately() {
        let mut module = PlacementModule::new();
        let log = recorder(&mut module);
        let obj = Placeable {
            object: ObjectRef(3),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            unit_bounds: None,
        };
        module.place_object(&obj, Vec3::ONE * 2.0, &camera());
        assert!(module.active().is_empty());
        assert_eq!(*log.borrow(), vec!["remove 3", "select 3", "add 3"]);
    }

    #[test]
    fn test_cancel_drops_motion() {
        let mut module = PlacementModule::new();
        let obj = Placeable {
            object: ObjectRef(4),
            position: Vec3::new(0.0, 0.0, 10.0),
            scale: Vec3::ZERO,
            unit_bounds: Some(Bounds::new(Vec3::ZERO, Vec3::ONE)),
        };
        module.place_object(&obj, Vec3::ONE, &camera());
        assert!(module.cancel(ObjectRef(4)));
        assert!(!module.cancel(ObjectRef(4)));
        assert!(module.update(Duration::from_millis(16)).is_empty());
    }

    #[test]
    fn test_preview_snaps_at_full_weight() {
        let mut preview = Pose::default();
        let origin = Pose {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 1.0),
        };
        PlacementModule::preview(&mut preview, &origin, 1.0, None);
        assert_eq!(preview.position, origin.position);
        assert!(preview.rotation.angle_to(origin.rotation) < 1e-4);

        let mut half = Pose::default();
        PlacementModule::preview(&mut half, &origin, 0.5, None);
        assert_eq!(half.position, Vec3::new(0.5, 1.0, 1.5));
    }
}
