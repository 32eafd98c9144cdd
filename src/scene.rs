//! Traversal of a [Model]'s node hierarchy.

use hedron::{Extras, Model, Node};
use nalgebra::{Matrix4, Translation3};

/// The axis a model considers "up".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpAxis {
    X,
    Y,
    Z,
}

impl UpAxis {
    /// Key of the up axis within a model's extras
    pub const EXTRAS_KEY: &'static str = "gltfUpAxis";

    /// Read the up axis recorded in `extras`.
    ///
    /// Defaults to [UpAxis::Y] if there is no entry or it isn't a number. Returns the raw value
    /// if it's a number that doesn't name an axis.
    pub fn from_extras(extras: &Extras) -> Result<Self, i64> {
        let Some(value) = extras.get(Self::EXTRAS_KEY) else {
            return Ok(UpAxis::Y);
        };
        match value.as_f64().unwrap_or(1.0) as i64 {
            0 => Ok(UpAxis::X),
            1 => Ok(UpAxis::Y),
            2 => Ok(UpAxis::Z),
            other => Err(other),
        }
    }

    /// The rotation taking this axis onto +Z.
    pub fn to_z_up(self) -> Matrix4<f64> {
        match self {
            #[rustfmt::skip]
            UpAxis::X => Matrix4::new(
                0.0, 0.0, -1.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            #[rustfmt::skip]
            UpAxis::Y => Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, -1.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            UpAxis::Z => Matrix4::identity(),
        }
    }
}

/// The correction rotating `model`'s up axis onto +Z.
///
/// Unknown axes are logged and receive no correction.
pub fn up_axis_correction(model: &Model) -> Matrix4<f64> {
    match UpAxis::from_extras(&model.extras) {
        Ok(axis) => axis.to_z_up(),
        Err(value) => {
            tracing::debug!(value, "unknown up axis");
            Matrix4::identity()
        }
    }
}

/// Compose `transform` (model to world) with `model`'s RTC center and up-axis correction.
pub fn root_transform(model: &Model, transform: &Matrix4<f64>) -> Matrix4<f64> {
    let mut res = *transform;
    if let Some(center) = model.rtc_center {
        res *= Translation3::from(center).to_homogeneous();
    }
    res * up_axis_correction(model)
}

/// The transform from `node`'s space to its parent's.
///
/// Uses the node's matrix unless it's missing or the identity, in which case the
/// translation, rotation, and scale are composed in that order (missing parts are the
/// identity).
pub fn local_transform(node: &Node) -> Matrix4<f64> {
    match node.matrix {
        Some(matrix) if matrix != Matrix4::identity() => matrix,
        _ => {
            let mut res = Matrix4::identity();
            if let Some(t) = node.translation {
                res *= Translation3::from(t).to_homogeneous();
            }
            if let Some(r) = node.rotation {
                res *= r.to_homogeneous();
            }
            if let Some(s) = node.scale {
                res *= Matrix4::new_nonuniform_scaling(&s);
            }
            res
        }
    }
}

/// A node reached while walking a model.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'m> {
    /// `None` for the stand-in node used when a model has meshes but no nodes
    pub node_index: Option<usize>,
    pub node: Option<&'m Node>,
    /// The node's mesh, if it has one that exists
    pub mesh_index: Option<usize>,
    /// Node space to world space
    pub transform: Matrix4<f64>,
    pub depth: usize,
}

/// The node indices to start walking from.
///
/// These are the roots of the default scene, or of the first scene if there's no default, or
/// the first node if there are no scenes. Empty if there are no nodes.
pub fn root_nodes(model: &Model) -> &[usize] {
    let scene = model
        .scene
        .and_then(|index| model.scenes.get(index))
        .or_else(|| model.scenes.first());
    match scene {
        Some(scene) => scene.nodes.as_slice(),
        None if !model.nodes.is_empty() => &[0],
        None => &[],
    }
}

/// Walk `model` depth first, calling `visit` for every node before its children.
///
/// `root` is the transform from the root of the hierarchy to world space, as produced by
/// [root_transform]. If the model has no nodes, `visit` is called once for every mesh, with the
/// root transform.
///
/// Nodes that don't exist are skipped with a warning, as are children that would form a cycle.
pub fn walk<'m>(model: &'m Model, root: &Matrix4<f64>, mut visit: impl FnMut(NodeVisit<'m>)) {
    if model.scenes.is_empty() && model.nodes.is_empty() {
        for mesh_index in 0..model.meshes.len() {
            visit(NodeVisit {
                node_index: None,
                node: None,
                mesh_index: Some(mesh_index),
                transform: *root,
                depth: 0,
            });
        }
        return;
    }

    let mut path = Vec::new();
    for &index in root_nodes(model) {
        walk_node(model, index, root, &mut path, &mut visit);
    }
}

fn walk_node<'m>(
    model: &'m Model,
    index: usize,
    parent: &Matrix4<f64>,
    path: &mut Vec<usize>,
    visit: &mut impl FnMut(NodeVisit<'m>),
) {
    let Some(node) = model.nodes.get(index) else {
        tracing::warn!(index, len = model.nodes.len(), "node index out of range");
        return;
    };
    if path.contains(&index) {
        tracing::warn!(index, "node is its own ancestor; skipping");
        return;
    }

    let transform = parent * local_transform(node);
    visit(NodeVisit {
        node_index: Some(index),
        node: Some(node),
        mesh_index: node.mesh.filter(|&mesh| mesh < model.meshes.len()),
        transform,
        depth: path.len(),
    });

    path.push(index);
    for &child in &node.children {
        walk_node(model, child, &transform, path, visit);
    }
    path.pop();
}

#[cfg(test)]
mod tests {
    use hedron::{Mesh, Scene};
    use nalgebra::{point, vector, UnitQuaternion, Vector3};
    use serde_json::json;

    use super::*;

    fn visits(model: &Model, root: &Matrix4<f64>) -> Vec<(Option<usize>, Option<usize>, Matrix4<f64>)> {
        let mut res = Vec::new();
        walk(model, root, |v| res.push((v.node_index, v.mesh_index, v.transform)));
        res
    }

    #[test]
    fn up_axis() {
        let mut model = Model::new();
        let y_up = UpAxis::Y.to_z_up();
        assert_eq!(up_axis_correction(&model), y_up);
        assert_eq!(y_up.transform_point(&point![0.0, 1.0, 0.0]), point![0.0, 0.0, 1.0]);
        let x_up = UpAxis::X.to_z_up();
        assert_eq!(x_up.transform_point(&point![1.0, 0.0, 0.0]), point![0.0, 0.0, 1.0]);

        for (value, expected) in [
            (json!(0), x_up),
            (json!(1), y_up),
            (json!(2), Matrix4::identity()),
            (json!(7), Matrix4::identity()),
            (json!("Z"), y_up),
        ] {
            model.extras.insert(UpAxis::EXTRAS_KEY.to_owned(), value.clone());
            assert_eq!(up_axis_correction(&model), expected, "{value}");
        }
    }

    #[test]
    fn rtc_center_precedes_up_axis() {
        let mut model = Model::new();
        model.rtc_center = Some(vector![10.0, 20.0, 30.0]);
        let root = root_transform(&model, &Matrix4::identity());
        // rotate Y-up to Z-up, then offset by the center
        assert_eq!(
            root.transform_point(&point![0.0, 1.0, 0.0]),
            point![10.0, 20.0, 31.0]
        );
    }

    #[test]
    fn local_transforms() {
        let mut node = Node {
            translation: Some(vector![1.0, 0.0, 0.0]),
            rotation: Some(UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                std::f64::consts::FRAC_PI_2,
            )),
            scale: Some(vector![2.0, 2.0, 2.0]),
            ..Default::default()
        };
        let p = local_transform(&node).transform_point(&point![1.0, 0.0, 0.0]);
        assert!((p - point![1.0, 2.0, 0.0]).norm() < 1e-12, "{p}");

        // an identity matrix defers to TRS
        node.matrix = Some(Matrix4::identity());
        let p = local_transform(&node).transform_point(&point![1.0, 0.0, 0.0]);
        assert!((p - point![1.0, 2.0, 0.0]).norm() < 1e-12, "{p}");

        node.matrix = Some(Matrix4::new_translation(&vector![0.0, 0.0, 5.0]));
        assert_eq!(
            local_transform(&node).transform_point(&point![0.0, 0.0, 0.0]),
            point![0.0, 0.0, 5.0]
        );
    }

    #[test]
    fn scene_fallbacks() {
        let mut model = Model::new();
        model.push_mesh(Mesh::default());
        model.push_mesh(Mesh::default());
        assert_eq!(
            visits(&model, &Matrix4::identity()),
            vec![
                (None, Some(0), Matrix4::identity()),
                (None, Some(1), Matrix4::identity())
            ]
        );

        let a = model.push_node(Node::with_mesh(1));
        let b = model.push_node(Node::with_mesh(0));
        assert_eq!(root_nodes(&model), &[a]);

        model.push_scene(Scene {
            nodes: vec![b],
            ..Default::default()
        });
        model.push_scene(Scene {
            nodes: vec![a, b],
            ..Default::default()
        });
        assert_eq!(root_nodes(&model), &[b]);
        model.scene = Some(1);
        assert_eq!(root_nodes(&model), &[a, b]);
        model.scene = Some(9);
        assert_eq!(root_nodes(&model), &[b]);
    }

    #[test]
    fn accumulates_transforms_and_skips_cycles() {
        let mut model = Model::new();
        let mesh = model.push_mesh(Mesh::default());
        let shift = |x: f64| Node {
            translation: Some(vector![x, 0.0, 0.0]),
            ..Default::default()
        };
        let root = model.push_node(Node {
            children: vec![1, 7],
            ..shift(1.0)
        });
        let child = model.push_node(Node {
            children: vec![root],
            mesh: Some(mesh),
            ..shift(2.0)
        });
        model.push_scene(Scene {
            nodes: vec![root],
            ..Default::default()
        });

        let res = visits(&model, &Matrix4::identity());
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].0, Some(root));
        assert_eq!(res[0].1, None);
        assert_eq!((res[1].0, res[1].1), (Some(child), Some(mesh)));
        assert_eq!(
            res[1].2.transform_point(&point![0.0, 0.0, 0.0]),
            point![3.0, 0.0, 0.0]
        );
    }
}
