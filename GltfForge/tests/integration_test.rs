use std::fs;
use std::sync::Mutex;

use glam::{Vec2, Vec3};
use gltfforge::json::{Hotspot, NodeExtensions, SkySphere};
use gltfforge::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct Glb {
    version: u32,
    length: u32,
    json: Value,
    bin: Option<Vec<u8>>,
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn parse_glb(bytes: &[u8]) -> Glb {
    assert_eq!(&bytes[0..4], b"glTF");
    let json_len = read_u32(bytes, 12) as usize;
    assert_eq!(&bytes[16..20], b"JSON");
    assert_eq!(json_len % 4, 0);
    let json = serde_json::from_slice(&bytes[20..20 + json_len]).unwrap();

    let bin_start = 20 + json_len;
    let bin = (bin_start < bytes.len()).then(|| {
        let bin_len = read_u32(bytes, bin_start) as usize;
        assert_eq!(&bytes[bin_start + 4..bin_start + 8], b"BIN\0");
        bytes[bin_start + 8..bin_start + 8 + bin_len].to_vec()
    });

    Glb {
        version: read_u32(bytes, 4),
        length: read_u32(bytes, 8),
        json,
        bin,
    }
}

/// One triangle with positions and UVs, indices written last.
fn build_triangle(builder: &mut GltfBuilder) -> Index<Mesh> {
    let position = builder.add_positions(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
    let uv = builder.add_tex_coords(&[Vec2::ZERO, Vec2::X, Vec2::Y]);
    let indices = builder.add_indices_u16(&[0, 1, 2]);
    let material = builder.add(Material::default());

    let mut primitive = Primitive {
        indices,
        material,
        ..Primitive::default()
    };
    primitive.attributes.position = position;
    primitive.attributes.tex_coords.push(uv);

    builder.add(Mesh {
        name: "triangle".to_string(),
        primitives: vec![primitive],
        ..Mesh::default()
    })
}

fn add_scene(builder: &mut GltfBuilder, mesh: Index<Mesh>) {
    let node = builder.add(Node {
        mesh,
        ..Node::named("triangle")
    });
    let scene = builder.add(Scene {
        nodes: vec![node],
        ..Scene::default()
    });
    builder.set_default_scene(scene);
}

#[test]
fn test_triangle_glb_end_to_end() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("triangle.glb");

    let report = export_to_file(&path, ExportOptions::new(), None, None, |builder, _| {
        let mesh = build_triangle(builder);
        add_scene(builder, mesh);
        Ok(())
    })
    .unwrap();
    assert_eq!(report.files, vec![path.clone()]);
    assert!(report.warnings.is_empty());

    let bytes = fs::read(&path).unwrap();
    let glb = parse_glb(&bytes);
    assert_eq!(glb.version, 2);
    assert_eq!(glb.length as usize, bytes.len());

    let doc = &glb.json;
    assert_eq!(doc["asset"]["version"], "2.0");
    assert_eq!(doc["scene"], 0);
    assert_eq!(doc["meshes"].as_array().unwrap().len(), 1);
    let primitives = doc["meshes"][0]["primitives"].as_array().unwrap();
    assert_eq!(primitives.len(), 1);
    assert_eq!(
        primitives[0]["attributes"],
        json!({ "POSITION": 0, "TEXCOORD_0": 1 })
    );
    assert_eq!(primitives[0]["indices"], 2);
    assert!(primitives[0].get("mode").is_none());
    assert_eq!(doc["accessors"].as_array().unwrap().len(), 3);
    assert_eq!(doc["materials"], json!([{ "pbrMetallicRoughness": {} }]));
    assert_eq!(doc["scenes"], json!([{ "nodes": [0] }]));
    assert!(doc["buffers"][0].get("uri").is_none());

    let view_total: u64 = doc["bufferViews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|view| view["byteLength"].as_u64().unwrap())
        .sum();
    assert_eq!(view_total, 36 + 24 + 6);
    let bin = glb.bin.unwrap();
    assert_eq!(bin.len() as u64, view_total.next_multiple_of(4));
    assert_eq!(doc["buffers"][0]["byteLength"], 66);
}

#[test]
fn test_external_layout_writes_sidecars() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.gltf");
    let options = ExportOptions::new().with_condensed_json(true);

    let report = export_to_file(&path, options, None, None, |builder, _| {
        let mesh = build_triangle(builder);
        add_scene(builder, mesh);
        let image = builder.add_image(b"not really a png", MimeType::Png, "albedo");
        builder.add(Texture {
            source: image,
            ..Texture::default()
        });
        Ok(())
    })
    .unwrap();

    let bin_path = dir.path().join("scene.bin");
    let image_path = dir.path().join("albedo.png");
    assert_eq!(report.files, vec![path.clone(), bin_path.clone(), image_path.clone()]);

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains('\n'));
    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["buffers"][0]["uri"], "scene.bin");
    assert_eq!(doc["images"], json!([{ "name": "albedo", "uri": "albedo.png" }]));

    let bin = fs::read(&bin_path).unwrap();
    assert_eq!(doc["buffers"][0]["byteLength"].as_u64().unwrap(), bin.len() as u64);
    assert_eq!(fs::read(&image_path).unwrap(), b"not really a png");
}

#[test]
fn test_pretty_json_by_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pretty.gltf");
    export_to_file(&path, ExportOptions::new(), None, None, |builder, _| {
        builder.add(Node::named("only"));
        Ok(())
    })
    .unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("\n  "));
}

#[test]
fn test_duplicate_images_share_storage() {
    let mut builder = GltfBuilder::in_memory(ExportOptions::new());
    let pixels = vec![7_u8; 256];

    let first = builder.add_image(&pixels, MimeType::Png, "a");
    let second = builder.add_image(&pixels.clone(), MimeType::Png, "b");
    let mut changed = pixels.clone();
    changed[100] = 8;
    let third = builder.add_image(&changed, MimeType::Png, "c");

    assert_eq!(first, second);
    assert_ne!(first, third);
    assert_eq!(builder.root().images.len(), 2);
    assert_eq!(builder.binary_buffer().unwrap().len(), 512);
}

#[test]
fn test_unlit_material_registers_extension() {
    let mut builder = GltfBuilder::in_memory(ExportOptions::new());
    builder.add(Material::unlit("flat"));
    let glb = parse_glb(&builder.to_glb_bytes().unwrap());

    assert_eq!(glb.json["extensionsUsed"], json!(["KHR_materials_unlit"]));
    assert!(glb.json.get("extensionsRequired").is_none());
    assert!(glb.bin.is_none());

    builder.add_extension(Extension::KhrMaterialsUnlit, true);
    let glb = parse_glb(&builder.to_glb_bytes().unwrap());
    assert_eq!(glb.json["extensionsRequired"], json!(["KHR_materials_unlit"]));
}

#[test]
fn test_index_stability_across_categories() {
    let mut builder = GltfBuilder::in_memory(ExportOptions::new());
    let names: Vec<String> = (0..20).map(|n| format!("node{n}")).collect();
    let nodes: Vec<Index<Node>> = names
        .iter()
        .map(|name| builder.add(Node::named(name.as_str())))
        .collect();
    let cameras: Vec<Index<Camera>> = (0..3).map(|_| builder.add(Camera::default())).collect();

    for (n, (index, name)) in nodes.iter().zip(&names).enumerate() {
        assert_eq!(index.position(), Some(n));
        assert_eq!(builder.get(*index), &Node::named(name.as_str()));
    }
    assert_eq!(cameras.last().unwrap().position(), Some(2));
}

#[test]
fn test_staged_tasks_build_the_document() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("staged.glb");
    let seen = Mutex::new(Vec::new());
    let progress = |update: &TaskProgress| {
        seen.lock().unwrap().push((update.priority, update.current, update.total));
    };

    export_to_file(&path, ExportOptions::new(), Some(&progress), None, |builder, tasks| {
        let root = builder.add(Node::named("root"));
        let scene = builder.add(Scene {
            nodes: vec![root],
            ..Scene::default()
        });
        builder.set_default_scene(scene);

        tasks.schedule_fn(TaskPriority::Mesh, "triangle", move |builder: &mut GltfBuilder, tasks| {
            let mesh = build_triangle(builder);
            let node = builder.add_child_component_node(root, Node::named("mesh"));
            builder.get_mut(node).mesh = mesh;
            tasks.schedule_fn(TaskPriority::Texture, "texture", |builder: &mut GltfBuilder, _| {
                let image = builder.add_image(&[1, 2, 3, 4], MimeType::Png, "tex");
                builder.add(Texture {
                    source: image,
                    ..Texture::default()
                });
                Ok(())
            })
        })
    })
    .unwrap();

    assert_eq!(
        seen.into_inner().unwrap(),
        vec![(TaskPriority::Mesh, 1, 1), (TaskPriority::Texture, 1, 1)]
    );

    let glb = parse_glb(&fs::read(&path).unwrap());
    assert_eq!(glb.json["nodes"][0]["children"], json!([1]));
    assert_eq!(glb.json["nodes"][1]["mesh"], 0);
    assert_eq!(glb.json["images"][0]["mimeType"], "image/png");
    assert_eq!(glb.json["textures"], json!([{ "source": 0 }]));
}

#[test]
fn test_vendor_extensions_follow_options() {
    let populate = |builder: &mut GltfBuilder| {
        let hotspot = builder.add(Hotspot::default());
        let sky = builder.add(SkySphere::default());
        builder.add(Node {
            extensions: NodeExtensions {
                hotspot,
                sky_sphere: sky,
                ..NodeExtensions::default()
            },
            ..Node::default()
        });
    };

    let mut with_vendor = GltfBuilder::in_memory(ExportOptions::new());
    populate(&mut with_vendor);
    let doc = parse_glb(&with_vendor.to_glb_bytes().unwrap()).json;
    assert_eq!(
        doc["extensionsUsed"],
        json!(["EPIC_animation_hotspots", "EPIC_sky_spheres"])
    );
    assert_eq!(doc["extensions"]["EPIC_animation_hotspots"]["hotspots"], json!([{}]));
    assert_eq!(
        doc["nodes"][0]["extensions"],
        json!({
            "EPIC_animation_hotspots": { "hotspot": 0 },
            "EPIC_sky_spheres": { "skySphere": 0 },
        })
    );

    let mut without = GltfBuilder::in_memory(ExportOptions::new().with_vendor_extensions(false));
    populate(&mut without);
    let doc = parse_glb(&without.to_glb_bytes().unwrap()).json;
    assert!(doc.get("extensions").is_none());
    assert!(doc.get("extensionsUsed").is_none());
    assert_eq!(doc["nodes"], json!([{}]));
}

#[test]
fn test_failed_sidecar_reports_warnings() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let path = missing.join("scene.gltf");

    let mut builder = GltfBuilder::new(&path, ExportOptions::new());
    let positions = builder.add_positions(&[Vec3::ZERO]);
    assert!(positions.is_unset());
    assert!(builder.root().accessors.is_empty());

    fs::create_dir(&missing).unwrap();
    let report = builder.write_to_file().unwrap();
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.files, vec![path.clone()]);
    assert!(!missing.join("scene.bin").exists());
}

#[test]
fn test_asset_metadata_from_options() {
    let options = ExportOptions::new()
        .with_generator("unit test")
        .with_copyright("(c) nobody");
    let builder = GltfBuilder::in_memory(options);
    let doc = parse_glb(&builder.to_glb_bytes().unwrap()).json;
    assert_eq!(
        doc["asset"],
        json!({ "generator": "unit test", "version": "2.0", "copyright": "(c) nobody" })
    );
}

#[test]
fn test_bin_output_path_keeps_its_buffer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.bin");

    let report = export_to_file(&path, ExportOptions::new(), None, None, |builder, _| {
        let mesh = build_triangle(builder);
        add_scene(builder, mesh);
        Ok(())
    })
    .unwrap();

    let sidecar = dir.path().join("scene_0.bin");
    assert_eq!(report.files, vec![path.clone(), sidecar.clone()]);

    let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["buffers"][0]["uri"], "scene_0.bin");
    let bin = fs::read(&sidecar).unwrap();
    assert_eq!(bin.len(), 66);
    assert_eq!(&bin[0..12], &[0; 12]);
}

#[test]
fn test_unwritable_document_removes_sidecar() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.gltf");
    fs::create_dir(&path).unwrap();

    let result = export_to_file(&path, ExportOptions::new(), None, None, |builder, _| {
        builder.add_positions(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
        Ok(())
    });

    assert!(matches!(result, Err(Error::OutputOpenFailed { .. })));
    assert!(!dir.path().join("out.bin").exists());
    assert!(path.is_dir());
}

#[test]
fn test_unwritable_image_removes_everything_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.gltf");
    fs::create_dir(dir.path().join("albedo.png")).unwrap();

    let result = export_to_file(&path, ExportOptions::new(), None, None, |builder, _| {
        let mesh = build_triangle(builder);
        add_scene(builder, mesh);
        builder.add_image(b"first image", MimeType::Png, "first");
        builder.add_image(b"second image", MimeType::Png, "albedo");
        Ok(())
    });

    assert!(matches!(result, Err(Error::OutputOpenFailed { .. })));
    assert!(!path.exists());
    assert!(!dir.path().join("scene.bin").exists());
    assert!(!dir.path().join("first.png").exists());
}
