/*!
 * Render planning.
 *
 * Turns a validated timeline and the global assets of a job into a
 * declarative list of media operations. Executing the plan is left to a
 * `Renderer` collaborator; resolving asset references to real media is left
 * to an `AssetResolver`.
 *
 * # Architecture
 *
 * - `plan`: operations, the immutable plan, global assets and styling
 * - `builder`: deterministic plan construction from a validated timeline
 * - `renderer`: the renderer seam and a JSON plan writer
 * - `resolver`: the asset resolution seam and its implementations
 */

pub mod plan;
pub mod builder;
pub mod renderer;
pub mod resolver;

// Re-export main types
pub use plan::{BackgroundVideo, GlobalAssets, RenderOperation, RenderPlan, Styling};
pub use builder::RenderPlanBuilder;
pub use renderer::{PlanWriter, Renderer};
pub use resolver::{AssetResolver, DirectoryResolver, PassthroughResolver};
