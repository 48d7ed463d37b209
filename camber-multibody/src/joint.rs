use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

/// The motion a joint allows between its parent and child bodies.
#[derive(Debug, Clone)]
pub enum JointKind {
    /// A rigid weld: no degree of freedom.
    Fixed,
    /// Rotation about an axis through the joint frame origin.
    Revolute(Unit<Vector3<f64>>),
    /// Translation along an axis.
    Prismatic(Unit<Vector3<f64>>),
}

/// A joint connecting a body to its parent.
///
/// `origin` is the fixed transform from the parent body frame to the joint
/// frame; the joint's motion is applied after it. Revolute and prismatic
/// joints contribute one generalized position and one generalized velocity
/// coordinate each; fixed joints contribute none.
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    kind: JointKind,
    origin: Isometry3<f64>,
    damping: f64,
}

impl Joint {
    /// Creates a weld joint.
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: JointKind::Fixed,
            origin: Isometry3::identity(),
            damping: 0.0,
        }
    }

    /// Creates a revolute joint about `axis`. The axis must be nonzero; it
    /// is normalized here.
    pub fn revolute(name: impl Into<String>, axis: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            kind: JointKind::Revolute(Unit::new_normalize(axis)),
            origin: Isometry3::identity(),
            damping: 0.0,
        }
    }

    /// Creates a prismatic joint along `axis`. The axis must be nonzero; it
    /// is normalized here.
    pub fn prismatic(name: impl Into<String>, axis: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            kind: JointKind::Prismatic(Unit::new_normalize(axis)),
            origin: Isometry3::identity(),
            damping: 0.0,
        }
    }

    /// Sets the parent-frame mounting transform.
    #[must_use]
    pub fn with_origin(mut self, origin: Isometry3<f64>) -> Self {
        self.origin = origin;
        self
    }

    /// Sets a viscous damping coefficient on the joint coordinate.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &JointKind {
        &self.kind
    }

    pub fn origin(&self) -> &Isometry3<f64> {
        &self.origin
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Number of generalized coordinates this joint contributes.
    pub fn num_dofs(&self) -> usize {
        match self.kind {
            JointKind::Fixed => 0,
            JointKind::Revolute(_) | JointKind::Prismatic(_) => 1,
        }
    }

    /// The joint-frame transform produced by coordinate value `q`.
    pub(crate) fn motion(&self, q: f64) -> Isometry3<f64> {
        match &self.kind {
            JointKind::Fixed => Isometry3::identity(),
            JointKind::Revolute(axis) => Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(axis, q),
            ),
            JointKind::Prismatic(axis) => Isometry3::from_parts(
                Translation3::from(axis.into_inner() * q),
                UnitQuaternion::identity(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::*;

    #[test]
    fn fixed_joints_have_no_dofs() {
        assert_eq!(Joint::fixed("weld").num_dofs(), 0);
        assert_eq!(Joint::revolute("hinge", Vector3::y()).num_dofs(), 1);
        assert_eq!(Joint::prismatic("slide", Vector3::x()).num_dofs(), 1);
    }

    #[test]
    fn revolute_motion_rotates_about_the_axis() {
        let joint = Joint::revolute("hinge", Vector3::z());
        let pose = joint.motion(std::f64::consts::FRAC_PI_2);
        let moved = pose * Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(moved, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn prismatic_motion_translates_along_the_axis() {
        let joint = Joint::prismatic("slide", Vector3::new(0.0, 0.0, 2.0));
        let pose = joint.motion(1.5);
        assert_relative_eq!(pose.translation.vector, Vector3::new(0.0, 0.0, 1.5));
    }
}
