use nalgebra::{Matrix3, Vector3};

/// An axis-aligned box attached to a body frame, used for terrain.
#[derive(Debug, Clone)]
pub struct BoxGeometry {
    pub half_extents: Vector3<f64>,
}

/// A rigid body: inertial properties plus optional contact points and
/// geometry, all expressed in the body frame.
#[derive(Debug, Clone)]
pub struct RigidBody {
    name: String,
    mass: f64,
    com: Vector3<f64>,
    inertia: Matrix3<f64>,
    contact_points: Vec<Vector3<f64>>,
    geometry: Option<BoxGeometry>,
}

impl RigidBody {
    /// Creates a body from its mass and rotational inertia about the
    /// center of mass. The center of mass starts at the body origin.
    pub fn new(name: impl Into<String>, mass: f64, inertia: Matrix3<f64>) -> Self {
        Self {
            name: name.into(),
            mass,
            com: Vector3::zeros(),
            inertia,
            contact_points: Vec::new(),
            geometry: None,
        }
    }

    /// Creates a solid box with the inertia of a uniform cuboid.
    pub fn uniform_box(name: impl Into<String>, mass: f64, half_extents: Vector3<f64>) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let inertia = Matrix3::from_diagonal(&Vector3::new(
            mass / 3.0 * (y * y + z * z),
            mass / 3.0 * (x * x + z * z),
            mass / 3.0 * (x * x + y * y),
        ));
        Self::new(name, mass, inertia).with_box_geometry(BoxGeometry { half_extents })
    }

    /// Moves the center of mass away from the body origin.
    #[must_use]
    pub fn with_center_of_mass(mut self, com: Vector3<f64>) -> Self {
        self.com = com;
        self
    }

    /// Adds a contact point, in body-frame coordinates.
    #[must_use]
    pub fn with_contact_point(mut self, point: Vector3<f64>) -> Self {
        self.contact_points.push(point);
        self
    }

    /// Attaches box geometry.
    #[must_use]
    pub fn with_box_geometry(mut self, geometry: BoxGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn center_of_mass(&self) -> &Vector3<f64> {
        &self.com
    }

    pub fn inertia(&self) -> &Matrix3<f64> {
        &self.inertia
    }

    pub fn contact_points(&self) -> &[Vector3<f64>] {
        &self.contact_points
    }

    pub fn geometry(&self) -> Option<&BoxGeometry> {
        self.geometry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn uniform_box_inertia_matches_the_cuboid_formula() {
        // A cube of side 2 and mass 6: I = 6/12 * (2^2 + 2^2) = 4 per axis.
        let body = RigidBody::uniform_box("cube", 6.0, Vector3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(body.inertia()[(0, 0)], 4.0);
        assert_relative_eq!(body.inertia()[(1, 1)], 4.0);
        assert_relative_eq!(body.inertia()[(2, 2)], 4.0);
        assert!(body.geometry().is_some());
    }

    #[test]
    fn contact_points_accumulate() {
        let body = RigidBody::new("wheel", 1.0, Matrix3::identity())
            .with_contact_point(Vector3::new(0.0, 0.0, -0.3))
            .with_contact_point(Vector3::new(0.1, 0.0, -0.3));
        assert_eq!(body.contact_points().len(), 2);
    }
}
