/// The orbiting-shapes scene: objects, particles, light, camera and the input
/// handlers that drive its animation.
use nalgebra::Point3;

use crate::animation::{
    advance, AngularState, AnimationState, CursorState, FrameUpdate, Motion, PHASES,
};
use crate::config::SceneConfig;
use crate::geometry::{Mesh, Primitive};
use crate::material::{DirectionalLight, Material};
use crate::particles::ParticleField;
use crate::projection::Camera;
use crate::raster::FrameBuffer;
use crate::transform::{RotationState, Transform};

/// One of the four shapes sharing the orbit.
#[derive(Debug, Clone)]
pub struct OrbitingObject {
    pub primitive: Primitive,
    pub mesh: Mesh,
    /// Fixed angular offset on the shared orbit
    pub phase: f32,
    pub position: Point3<f32>,
    pub rotation: RotationState,
}

pub struct Scene {
    pub objects: Vec<OrbitingObject>,
    pub particles: ParticleField,
    pub material: Material,
    pub light: DirectionalLight,
    pub camera: Camera,
    motion: Motion,
    state: AnimationState,
    viewport: (u32, u32),
    cell_aspect: f32,
}

impl Scene {
    /// Build the scene for a `width x height` viewport whose cells are
    /// `cell_aspect` times as wide as they are tall.
    pub fn new(config: &SceneConfig, width: u32, height: u32, cell_aspect: f32) -> Self {
        let motion = config.motion();

        let mut camera = Camera::new(width, height);
        camera.fov = config.camera.fov.to_radians();
        camera.near = config.camera.near;
        camera.far = config.camera.far;
        camera.position = Point3::new(0.0, 0.0, config.camera.distance);
        camera.resize(width, height, cell_aspect);

        let objects = Primitive::ALL
            .iter()
            .zip(PHASES)
            .map(|(&primitive, phase)| OrbitingObject {
                primitive,
                mesh: primitive.mesh(),
                phase,
                position: motion.orbit.position(phase),
                rotation: RotationState::zero(),
            })
            .collect();

        let particles = ParticleField::scatter(
            config.particles.count,
            config.particles.spread,
            config.particles.seed,
            config.particles.color,
        );

        tracing::info!(width, height, particles = particles.len(), "scene created");

        Self {
            objects,
            particles,
            material: config.material(),
            light: config.light(),
            camera,
            motion,
            state: AnimationState::default(),
            viewport: (width, height),
            cell_aspect,
        }
    }

    /// Scroll input: `delta_y` follows the browser convention (positive is
    /// scrolling down).
    pub fn on_wheel(&mut self, delta_y: f32) {
        self.state.angular.impulse(delta_y, self.motion.wheel_gain);
        tracing::debug!(delta_y, speed = self.state.angular.speed, "wheel impulse");
    }

    /// Pointer moved to `(client_x, client_y)` in viewport cells.
    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        let (width, height) = self.viewport;
        self.state.cursor = CursorState::from_pointer(client_x, client_y, width, height);
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.resize(width, height, self.cell_aspect);
        tracing::debug!(width, height, aspect = self.camera.aspect, "viewport resized");
    }

    /// Advance the animation by one tick that took `dt` seconds.
    pub fn frame(&mut self, dt: f32) -> FrameUpdate {
        let update = advance(&mut self.state, &self.motion, dt);

        for (object, position) in self.objects.iter_mut().zip(update.positions) {
            object.position = position;
            object.rotation.rotate(update.spin.x, update.spin.y, update.spin.z);
        }
        self.camera.position.x = update.camera_offset.x;
        self.camera.position.y = update.camera_offset.y;

        tracing::trace!(
            rotation = self.state.angular.rotation,
            speed = self.state.angular.speed,
            dt,
            "frame"
        );
        update
    }

    /// Draw the whole scene into `frame`, replacing its previous contents.
    pub fn render(&self, frame: &mut FrameBuffer) {
        frame.clear();
        for object in &self.objects {
            let model = Transform::model_matrix(&object.position, &object.rotation);
            frame.draw_mesh(&object.mesh, &model, &self.camera, &self.material, &self.light);
        }
        frame.draw_points(&self.particles.points, &self.camera);
    }

    pub fn angular(&self) -> AngularState {
        self.state.angular
    }

    pub fn cursor(&self) -> CursorState {
        self.state.cursor
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Shade;

    fn small_scene() -> Scene {
        let mut config = SceneConfig::default();
        config.particles.count = 50;
        Scene::new(&config, 80, 40, 0.5)
    }

    #[test]
    fn test_objects_start_on_orbit_at_their_phase() {
        let scene = small_scene();
        assert_eq!(scene.objects.len(), 4);
        let orbit = scene.motion().orbit;
        for (object, phase) in scene.objects.iter().zip(PHASES) {
            assert_eq!(object.phase, phase);
            assert_eq!(object.position, orbit.position(phase));
        }
        assert_eq!(scene.objects[2].primitive, Primitive::TorusKnot);
    }

    #[test]
    fn test_wheel_then_frames_moves_objects_along_orbit() {
        let mut scene = small_scene();
        scene.on_wheel(100.0);
        scene.on_wheel(100.0);
        assert!((scene.angular().speed - 0.04).abs() < 1e-6);

        let before = scene.objects[0].position;
        scene.frame(0.016);
        let after = scene.objects[0].position;
        assert_ne!(before, after);
        assert!((scene.angular().rotation - 0.04).abs() < 1e-6);

        let orbit = scene.motion().orbit;
        for _ in 0..30 {
            scene.frame(0.016);
            for object in &scene.objects {
                assert!(((object.position - orbit.center).norm() - orbit.radius).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_first_frame_with_zero_dt_leaves_spin_alone() {
        let mut scene = small_scene();
        scene.on_pointer_move(70.0, 5.0);
        scene.frame(0.0);
        for object in &scene.objects {
            assert_eq!(object.rotation, RotationState::zero());
        }
        assert_eq!(scene.camera.position.x, 0.0);
        assert_eq!(scene.camera.position.z, 6.0);
    }

    #[test]
    fn test_camera_follows_cursor_without_accumulating() {
        let mut scene = small_scene();
        scene.on_pointer_move(80.0, 0.0);
        assert!((scene.cursor().x - 0.5).abs() < 1e-6);
        assert!((scene.cursor().y + 0.5).abs() < 1e-6);

        for _ in 0..5 {
            scene.frame(0.1);
        }
        assert!((scene.camera.position.x - 0.15).abs() < 1e-5);
        assert!((scene.camera.position.y - 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_resize_updates_camera_and_cursor_scale() {
        let mut scene = small_scene();
        scene.on_resize(200, 50);
        assert_eq!(scene.viewport(), (200, 50));
        assert!((scene.camera.aspect - 2.0).abs() < 1e-6);

        scene.on_pointer_move(100.0, 25.0);
        assert_eq!(scene.cursor(), CursorState { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_render_draws_surfaces_and_particles() {
        let mut config = SceneConfig::default();
        config.particles.count = 2000;
        let mut scene = Scene::new(&config, 120, 40, 0.5);
        scene.frame(0.0);

        let mut frame = FrameBuffer::new(120, 40);
        scene.render(&mut frame);
        let surfaces = frame
            .cells()
            .iter()
            .filter(|c| matches!(c, Shade::Surface(_)))
            .count();
        let particles = frame.cells().iter().filter(|c| **c == Shade::Particle).count();
        assert!(surfaces > 0);
        assert!(particles > 0);
    }
}
