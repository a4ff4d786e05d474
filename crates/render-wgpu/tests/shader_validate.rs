use raycast_render_wgpu::shaders;

// Parse and validate an embedded WGSL module with naga.
fn validate_wgsl(name: &str, source: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(m) => m,
        Err(e) => panic!(
            "WGSL parsing error in {name}:\n{error_report}",
            error_report = e.emit_to_string(source)
        ),
    };

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!(
            "WGSL validation error in {name}:\n{error_report}",
            error_report = e.emit_to_string(source)
        );
    }
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn raycast_shader_validates() {
    let module = validate_wgsl("raycast", shaders::RAYCAST_SHADER);
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_fullscreen"));
    assert!(entries.contains(&"fs_raycast"));
}

#[test]
fn blit_shader_validates() {
    let module = validate_wgsl("blit", shaders::BLIT_SHADER);
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_fullscreen"));
    assert!(entries.contains(&"fs_blit"));
}

#[test]
fn raycast_uniforms_match_host_layout() {
    let module = validate_wgsl("raycast", shaders::RAYCAST_SHADER);
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("FrameUniforms"))
        .expect("FrameUniforms struct");
    match &ty.inner {
        naga::TypeInner::Struct { members, span } => {
            assert_eq!(members.len(), 9);
            assert_eq!(*span, 9 * 16);
        }
        other => panic!("unexpected uniform type {other:?}"),
    }
}
