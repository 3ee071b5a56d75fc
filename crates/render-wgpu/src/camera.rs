use glam::{Mat4, Vec3};

/// Orbit camera circling a fixed target point.
/// Camera motion is host-side input state and never feeds back into updates.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 26.0,
            yaw: -90.0_f32.to_radians(),
            pitch: -35.0_f32.to_radians(),
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        );
        self.target - offset * self.distance
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(2.0, 200.0);
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_is_valid() {
        let cam = OrbitCamera::default();
        assert!(cam.eye().y > 0.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn orbit_moves_the_eye() {
        let mut cam = OrbitCamera::default();
        let start = cam.eye();
        cam.orbit(40.0, 10.0);
        assert_ne!(cam.eye(), start);
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, -100_000.0);
        assert!(cam.pitch <= 89.0_f32.to_radians());
    }

    #[test]
    fn zoom_respects_bounds() {
        let mut cam = OrbitCamera::default();
        cam.zoom(10_000.0);
        assert_eq!(cam.distance, 2.0);
        cam.zoom(-10_000.0);
        assert_eq!(cam.distance, 200.0);
    }
}
