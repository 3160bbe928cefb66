//! # GltfForge
//!
//! A write-only glTF 2.0 exporter core: register scene entities by typed
//! index, pack vertex and image data into a binary buffer, defer
//! order-dependent construction to a staged task queue, and write the result
//! as a `.glb` or a `.gltf` with a `.bin` sidecar.
//!
//! ## Components
//!
//! - **Document model** ([`json`]) - plain-data glTF entities linked by
//!   [`Index`](json::Index) handles, plus the extension registry and the
//!   serializer
//! - **Builder** ([`builder`]) - the per-export session: `add`/`get`, node
//!   hierarchy, buffer packing, image deduplication, container output
//! - **Tasks** ([`task`]) - priority-staged deferred work with progress and
//!   cancellation
//!
//! ## Quick Start
//!
//! ```no_run
//! use gltfforge::prelude::*;
//! use glam::{Vec2, Vec3};
//!
//! let report = export_to_file("triangle.glb", ExportOptions::new(), None, None, |builder, _tasks| {
//!     let position = builder.add_positions(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
//!     let uv = builder.add_tex_coords(&[Vec2::ZERO, Vec2::X, Vec2::Y]);
//!     let material = builder.add(Material::default());
//!
//!     let mut primitive = Primitive { material, ..Primitive::default() };
//!     primitive.attributes.position = position;
//!     primitive.attributes.tex_coords.push(uv);
//!     let mesh = builder.add(Mesh { primitives: vec![primitive], ..Mesh::default() });
//!
//!     let node = builder.add(Node { mesh, ..Node::default() });
//!     let scene = builder.add(Scene { nodes: vec![node], ..Scene::default() });
//!     builder.set_default_scene(scene);
//!     Ok(())
//! })?;
//! println!("wrote {:?}", report.files);
//! # Ok::<(), gltfforge::Error>(())
//! ```
//!
//! ### Deferred Construction
//!
//! ```
//! use gltfforge::prelude::*;
//!
//! let mut builder = GltfBuilder::in_memory(ExportOptions::new());
//! let mut tasks = TaskScheduler::new();
//! tasks.schedule_fn(TaskPriority::Mesh, "mesh", |builder: &mut GltfBuilder, tasks| {
//!     let material = Material::default();
//!     tasks.schedule_fn(TaskPriority::Material, "material", move |builder: &mut GltfBuilder, _| {
//!         builder.add(material);
//!         Ok(())
//!     })?;
//!     builder.add(Mesh::default());
//!     Ok(())
//! })?;
//! tasks.run_all(&mut builder, None, None)?;
//! assert_eq!(builder.root().materials.len(), 1);
//! # Ok::<(), gltfforge::Error>(())
//! ```

pub mod builder;
pub mod error;
pub mod json;
pub mod options;
pub mod task;

// Re-exports for convenience
pub use builder::{ExportReport, GltfBuilder, export_to_file};
pub use error::{Error, Result};
pub use options::{ContainerLayout, ExportOptions, ImageStorage};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::options::{ContainerLayout, ExportOptions, ImageStorage};

    pub use crate::builder::{ExportReport, GltfBuilder, MessageLog, export_to_file};

    // Document model
    pub use crate::json::{
        Accessor, AccessorType, Animation, Buffer, BufferTarget, BufferView, Camera, ComponentType,
        Extension, Image, Index, JsonRoot, Light, Material, Mesh, MimeType, Node, NodeTransform,
        Primitive, Sampler, Scene, Skin, Texture, TextureInfo,
    };

    // Tasks
    pub use crate::task::{
        CancellationToken, Task, TaskPriority, TaskProgress, TaskProgressCallback, TaskRunOutcome,
        TaskScheduler,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
