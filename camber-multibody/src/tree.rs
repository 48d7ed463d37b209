use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use camber_core::ConfigurationError;

use crate::body::RigidBody;
use crate::joint::{Joint, JointKind};

/// Index of a body within a [`RigidBodyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyIndex(pub(crate) usize);

impl BodyIndex {
    /// The fixed world body every tree is rooted at.
    pub const WORLD: BodyIndex = BodyIndex(0);

    /// The raw index value.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A flat, axis-aligned terrain surface extracted from welded box
/// geometry. The top face sits at `top`; the footprint spans
/// `center ± half_extents` in x and y.
#[derive(Debug, Clone, Copy)]
pub struct TerrainSurface {
    pub center: Vector3<f64>,
    pub half_extents: Vector3<f64>,
    pub top: f64,
}

#[derive(Debug)]
struct BodyNode {
    body: RigidBody,
    parent: usize,
    joint: Joint,
    dof: Option<usize>,
}

/// A tree of rigid bodies rooted at a fixed world body.
///
/// Every body except world has exactly one parent joint. Bodies must be
/// added parent-first; each revolute or prismatic joint claims the next
/// generalized coordinate index, so the total position size equals the sum
/// of joint degrees of freedom.
#[derive(Debug)]
pub struct RigidBodyTree {
    nodes: Vec<BodyNode>,
    num_dofs: usize,
}

impl RigidBodyTree {
    /// Creates a tree holding only the world body.
    pub fn new() -> Self {
        Self {
            nodes: vec![BodyNode {
                body: RigidBody::new("world", 0.0, nalgebra::Matrix3::zeros()),
                parent: 0,
                joint: Joint::fixed("world"),
                dof: None,
            }],
            num_dofs: 0,
        }
    }

    /// Attaches `body` to `parent` through `joint`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the parent index is not in the
    /// tree or the body or joint name is already taken.
    pub fn add_body(
        &mut self,
        parent: BodyIndex,
        body: RigidBody,
        joint: Joint,
    ) -> Result<BodyIndex, ConfigurationError> {
        if parent.0 >= self.nodes.len() {
            return Err(ConfigurationError::UnknownParentBody {
                index: parent.0,
                bodies: self.nodes.len(),
            });
        }
        if self.find_body(body.name()).is_some() {
            return Err(ConfigurationError::DuplicateBodyName(body.name().to_owned()));
        }
        if self.find_joint(joint.name()).is_some() {
            return Err(ConfigurationError::DuplicateJointName(
                joint.name().to_owned(),
            ));
        }

        let dof = (joint.num_dofs() > 0).then(|| {
            let next = self.num_dofs;
            self.num_dofs += 1;
            next
        });
        self.nodes.push(BodyNode {
            body,
            parent: parent.0,
            joint,
            dof,
        });
        Ok(BodyIndex(self.nodes.len() - 1))
    }

    /// Welds a flat box-shaped terrain body to world.
    ///
    /// The box is axis-aligned with world X/Y, spans `box_size` in both,
    /// extends `box_depth` downward, and its top face sits exactly at
    /// height zero. Each call adds one body; calling this twice adds two
    /// overlapping terrain bodies rather than reusing the first.
    pub fn add_flat_terrain(&mut self, box_size: f64, box_depth: f64) -> BodyIndex {
        let mut n = self.nodes.len();
        let name = loop {
            let candidate = format!("terrain_{n}");
            if self.find_body(&candidate).is_none() && self.find_joint(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };

        let half = Vector3::new(box_size / 2.0, box_size / 2.0, box_depth / 2.0);
        let body = RigidBody::uniform_box(name.as_str(), 0.0, half);
        let weld = Joint::fixed(name).with_origin(Isometry3::from_parts(
            Translation3::new(0.0, 0.0, -box_depth / 2.0),
            UnitQuaternion::identity(),
        ));
        self.add_body(BodyIndex::WORLD, body, weld)
            .expect("terrain body and joint names are unique")
    }

    /// Number of bodies, the world included.
    pub fn num_bodies(&self) -> usize {
        self.nodes.len()
    }

    /// Number of generalized position coordinates.
    pub fn num_positions(&self) -> usize {
        self.num_dofs
    }

    /// Number of generalized velocity coordinates.
    pub fn num_velocities(&self) -> usize {
        self.num_dofs
    }

    /// The body at `index`.
    pub fn body(&self, index: BodyIndex) -> &RigidBody {
        &self.nodes[index.0].body
    }

    /// The joint connecting the body at `index` to its parent.
    pub fn joint(&self, index: BodyIndex) -> &Joint {
        &self.nodes[index.0].joint
    }

    /// The parent body, or `None` for world.
    pub fn parent(&self, index: BodyIndex) -> Option<BodyIndex> {
        (index.0 != 0).then(|| BodyIndex(self.nodes[index.0].parent))
    }

    /// The generalized coordinate index owned by the body's parent joint.
    pub fn position_index(&self, index: BodyIndex) -> Option<usize> {
        self.nodes[index.0].dof
    }

    /// Looks a body up by name.
    pub fn find_body(&self, name: &str) -> Option<BodyIndex> {
        self.nodes
            .iter()
            .position(|node| node.body.name() == name)
            .map(BodyIndex)
    }

    /// Looks a joint up by name, returning its child body.
    pub fn find_joint(&self, name: &str) -> Option<BodyIndex> {
        self.nodes
            .iter()
            .position(|node| node.joint.name() == name)
            .map(BodyIndex)
    }

    /// Iterates over every body index, world first.
    pub fn bodies(&self) -> impl Iterator<Item = BodyIndex> + '_ {
        (0..self.nodes.len()).map(BodyIndex)
    }

    /// The world pose of a body connected to world through fixed joints
    /// only, or `None` when any joint on the path can move.
    pub(crate) fn static_pose(&self, index: BodyIndex) -> Option<Isometry3<f64>> {
        let mut pose = Isometry3::identity();
        let mut at = index.0;
        while at != 0 {
            let node = &self.nodes[at];
            if !matches!(node.joint.kind(), JointKind::Fixed) {
                return None;
            }
            pose = node.joint.origin() * pose;
            at = node.parent;
        }
        Some(pose)
    }

    /// Flat terrain surfaces: welded bodies with box geometry.
    pub fn terrain_surfaces(&self) -> Vec<TerrainSurface> {
        self.bodies()
            .filter_map(|index| {
                let geometry = self.body(index).geometry()?;
                let pose = self.static_pose(index)?;
                let center = pose.translation.vector;
                Some(TerrainSurface {
                    center,
                    half_extents: geometry.half_extents,
                    top: center.z + geometry.half_extents.z,
                })
            })
            .collect()
    }
}

impl Default for RigidBodyTree {
    fn default() -> Self {
        Self::new()
    }
}
