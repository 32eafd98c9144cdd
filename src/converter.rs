use hedron::Model;
use nalgebra::Matrix4;

use crate::{
    collision::{CollisionCooker, NoCollision},
    error::PrimitiveError,
    options::CreateModelOptions,
    primitive::{self, Collaborators, PrimitiveContext, PrimitiveResult},
    scene::{root_transform, walk},
    tangent::{MikkTSpace, TangentGenerator},
    texture::{TextureIndexResolver, TextureResolver},
};

/// The converted primitives of one mesh, in source order.
///
/// A primitive that could not be converted is represented by the reason it was skipped.
#[derive(Debug, Clone)]
pub struct MeshResult<H, M> {
    pub mesh_index: usize,
    pub primitives: Vec<Result<PrimitiveResult<H, M>, PrimitiveError>>,
}

/// One node reached while walking a model.
#[derive(Debug, Clone)]
pub struct NodeResult<H, M> {
    /// `None` for a mesh converted without a node
    pub node_index: Option<usize>,
    /// Node space to world space
    pub transform: Matrix4<f64>,
    pub mesh: Option<MeshResult<H, M>>,
}

/// Everything converted from a [Model], in traversal order.
#[derive(Debug, Clone)]
pub struct ModelResult<H, M> {
    /// Model space to world space, after RTC and up-axis corrections
    pub root_transform: Matrix4<f64>,
    pub nodes: Vec<NodeResult<H, M>>,
}

impl<H, M> ModelResult<H, M> {
    /// Every successfully converted primitive.
    pub fn primitives(&self) -> impl Iterator<Item = &PrimitiveResult<H, M>> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.mesh.as_ref())
            .flat_map(|m| m.primitives.iter())
            .filter_map(|p| p.as_ref().ok())
    }

    /// `(mesh index, primitive index, reason)` for every skipped primitive.
    pub fn skipped(&self) -> impl Iterator<Item = (usize, usize, &PrimitiveError)> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.mesh.as_ref())
            .flat_map(|m| {
                m.primitives
                    .iter()
                    .enumerate()
                    .filter_map(move |(i, p)| p.as_ref().err().map(|e| (m.mesh_index, i, e)))
            })
    }
}

/// Converts [Models](Model) into render-ready geometry.
///
/// Conversion only reads the model and writes to its own result, so one converter may be
/// shared between threads converting different models (or the same one) at once.
#[derive(Debug, Clone, Default)]
pub struct ModelConverter<R = TextureIndexResolver, C = NoCollision, G = MikkTSpace> {
    pub options: CreateModelOptions,
    pub resolver: R,
    pub cooker: C,
    pub generator: G,
}

static_assertions::assert_impl_all!(ModelConverter: Send, Sync);

impl ModelConverter {
    #[inline]
    pub fn new(options: CreateModelOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }
}

impl<R, C, G> ModelConverter<R, C, G>
where
    R: TextureResolver,
    C: CollisionCooker,
    G: TangentGenerator,
{
    pub fn with_resolver<R2: TextureResolver>(self, resolver: R2) -> ModelConverter<R2, C, G> {
        ModelConverter {
            options: self.options,
            resolver,
            cooker: self.cooker,
            generator: self.generator,
        }
    }

    pub fn with_cooker<C2: CollisionCooker>(self, cooker: C2) -> ModelConverter<R, C2, G> {
        ModelConverter {
            options: self.options,
            resolver: self.resolver,
            cooker,
            generator: self.generator,
        }
    }

    pub fn with_generator<G2: TangentGenerator>(self, generator: G2) -> ModelConverter<R, C, G2> {
        ModelConverter {
            options: self.options,
            resolver: self.resolver,
            cooker: self.cooker,
            generator,
        }
    }

    #[inline]
    fn collaborators(&self) -> Collaborators<'_, R, C, G> {
        Collaborators {
            options: &self.options,
            resolver: &self.resolver,
            cooker: &self.cooker,
            generator: &self.generator,
        }
    }

    /// Convert every primitive reachable from `model`'s active scene.
    ///
    /// `transform` takes model space to world space. Primitives that can't be converted are
    /// logged and recorded in the result; they never prevent the conversion of the rest of the
    /// model.
    #[tracing::instrument(skip_all, fields(meshes = model.meshes.len(), nodes = model.nodes.len()))]
    pub fn convert(
        &self,
        model: &Model,
        transform: &Matrix4<f64>,
    ) -> ModelResult<R::Handle, C::Mesh> {
        let root = root_transform(model, transform);
        let mut nodes = Vec::new();
        walk(model, &root, |visit| {
            let mesh = visit.mesh_index.map(|mesh_index| {
                let mesh = &model.meshes[mesh_index];
                let _span = tracing::debug_span!("convert mesh", mesh_index).entered();
                let primitives = (0..mesh.primitives.len())
                    .map(|primitive_index| {
                        let ctx = PrimitiveContext {
                            model,
                            mesh_index,
                            mesh,
                            node: visit.node,
                            primitive_index,
                            primitive: &mesh.primitives[primitive_index],
                            transform: visit.transform,
                        };
                        self.convert_primitive(&ctx)
                    })
                    .collect();
                MeshResult {
                    mesh_index,
                    primitives,
                }
            });
            nodes.push(NodeResult {
                node_index: visit.node_index,
                transform: visit.transform,
                mesh,
            });
        });

        ModelResult {
            root_transform: root,
            nodes,
        }
    }

    /// Convert a single primitive, logging why it was skipped if it can't be converted.
    pub fn convert_primitive(
        &self,
        ctx: &PrimitiveContext<'_>,
    ) -> Result<PrimitiveResult<R::Handle, C::Mesh>, PrimitiveError> {
        primitive::convert(ctx, self.collaborators()).map_err(|e| {
            tracing::warn!(
                mesh = ctx.mesh_index,
                primitive = ctx.primitive_index,
                error = %e,
                "skipping primitive"
            );
            e
        })
    }
}
