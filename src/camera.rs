//! Orbit camera around the sign.
//!
//! The camera sits on a sphere around a target point. Dragging with the left
//! mouse button orbits, the wheel zooms, and both motions ease out with
//! damping. Distance and both angles are clamped to [`OrbitLimits`].

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};

use cgmath::{Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Angle from the +y axis.
    pub min_polar: f32,
    pub max_polar: f32,
    /// Angle around +y, zero looking from +z.
    pub min_azimuth: f32,
    pub max_azimuth: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_distance: 10.0,
            min_polar: FRAC_PI_6,
            max_polar: PI / 1.5,
            min_azimuth: -FRAC_PI_4,
            max_azimuth: FRAC_PI_2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub limits: OrbitLimits,
}

impl OrbitCamera {
    /// A camera on the +z axis looking at `target` from `distance`.
    pub fn new(target: Point3<f32>, distance: f32) -> Self {
        let mut camera = Self {
            target,
            distance,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            limits: OrbitLimits::default(),
        };
        camera.clamp();
        camera
    }

    pub fn eye(&self) -> Point3<f32> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + self.distance * Vector3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), self.target, Vector3::unit_y())
    }

    fn clamp(&mut self) {
        let l = &self.limits;
        self.distance = self.distance.clamp(l.min_distance, l.max_distance);
        self.polar = self.polar.clamp(l.min_polar, l.max_polar);
        self.azimuth = self.azimuth.clamp(l.min_azimuth, l.max_azimuth);
    }
}

pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

impl std::fmt::Debug for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field("aspect", &self.aspect)
            .field("fovy", &self.fovy)
            .finish()
    }
}

/// Turns mouse input into eased camera motion.
#[derive(Debug)]
pub struct OrbitController {
    rotate_speed: f32,
    zoom_speed: f32,
    /// Fraction of the pending motion applied per update.
    damping: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
    dragging: bool,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32, damping: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            damping: damping.clamp(0.01, 1.0),
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 0.0,
            dragging: false,
        }
    }

    /// Raw mouse motion in pixels. Only orbits while the left button is held.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if !self.dragging {
            return;
        }
        self.pending_azimuth -= dx as f32 * self.rotate_speed;
        self.pending_polar -= dy as f32 * self.rotate_speed;
    }

    pub fn handle_scroll(&mut self, delta: &MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 50.0,
        };
        self.pending_zoom -= lines * self.zoom_speed;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => self.dragging = *state == ElementState::Pressed,
            WindowEvent::MouseWheel { delta, .. } => self.handle_scroll(delta),
            WindowEvent::Focused(false) => self.dragging = false,
            _ => (),
        }
    }

    /// Apply part of the pending motion and keep the rest for later frames.
    pub fn update(&mut self, camera: &mut OrbitCamera, _dt: Duration) {
        let azimuth = self.pending_azimuth * self.damping;
        let polar = self.pending_polar * self.damping;
        let zoom = self.pending_zoom * self.damping;
        camera.azimuth += azimuth;
        camera.polar += polar;
        camera.distance += zoom;
        camera.clamp();
        self.pending_azimuth -= azimuth;
        self.pending_polar -= polar;
        self.pending_zoom -= zoom;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &OrbitCamera, projection: &Projection) {
        self.view_position = camera.eye().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

/// Everything the GPU needs from the camera, bundled with its controller.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: OrbitCamera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    /// Re-derive the uniform and upload it.
    pub fn write(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn settle(controller: &mut OrbitController, camera: &mut OrbitCamera) {
        for _ in 0..500 {
            controller.update(camera, Duration::from_millis(16));
        }
    }

    #[test]
    fn starts_on_the_positive_z_axis() {
        let camera = OrbitCamera::new(Point3::new(0.0, 0.0, 0.0), 5.0);
        let eye = camera.eye();
        assert!((eye - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 0.0), 5.0);
        let mut controller = OrbitController::new(0.01, 1.0, 0.1);
        controller.handle_scroll(&MouseScrollDelta::LineDelta(0.0, 100.0));
        settle(&mut controller, &mut camera);
        assert_eq!(camera.distance, 2.0);
        controller.handle_scroll(&MouseScrollDelta::LineDelta(0.0, -100.0));
        settle(&mut controller, &mut camera);
        assert_eq!(camera.distance, 10.0);
    }

    #[test]
    fn orbit_angles_are_clamped() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 0.0), 5.0);
        let mut controller = OrbitController::new(0.01, 1.0, 0.1);
        controller.dragging = true;
        controller.handle_mouse(-10_000.0, 10_000.0);
        settle(&mut controller, &mut camera);
        assert_eq!(camera.azimuth, FRAC_PI_2);
        assert_eq!(camera.polar, FRAC_PI_6);
        controller.handle_mouse(10_000.0, -10_000.0);
        settle(&mut controller, &mut camera);
        assert_eq!(camera.azimuth, -FRAC_PI_4);
        assert_eq!(camera.polar, PI / 1.5);
    }

    #[test]
    fn motion_eases_out() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 0.0), 5.0);
        let mut controller = OrbitController::new(0.01, 1.0, 0.1);
        controller.dragging = true;
        controller.handle_mouse(-10.0, 0.0);
        controller.update(&mut camera, Duration::from_millis(16));
        let first_step = camera.azimuth;
        controller.update(&mut camera, Duration::from_millis(16));
        let second_step = camera.azimuth - first_step;
        assert!(first_step > 0.0);
        assert!(second_step > 0.0 && second_step < first_step);
        settle(&mut controller, &mut camera);
        assert!((camera.azimuth - 0.1).abs() < 1e-4);
    }

    #[test]
    fn moving_without_the_button_does_nothing() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 0.0), 5.0);
        let before = camera.clone();
        let mut controller = OrbitController::new(0.01, 1.0, 0.1);
        controller.handle_mouse(100.0, 100.0);
        settle(&mut controller, &mut camera);
        assert_eq!(camera, before);
    }
}
