/// WGSL ray caster: one fragment per pixel, same algorithm as the CPU evaluator.
pub const RAYCAST_SHADER: &str = r#"
struct FrameUniforms {
    // width, height, aspect, normal coloring (0 = clamped, 1 = biased)
    window: vec4<f32>,
    position: vec4<f32>,
    forward: vec4<f32>,
    right: vec4<f32>,
    up: vec4<f32>,
    // center.xyz, radius
    sphere: vec4<f32>,
    cell_half_extents: vec4<f32>,
    surface_color: vec4<f32>,
    background_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

const RECIP_SATURATION: f32 = 1.0e20;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> VertexOutput {
    let x = f32((index << 1u) & 2u);
    let y = f32(index & 2u);
    var out: VertexOutput;
    out.clip_position = vec4<f32>(x * 2.0 - 1.0, y * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(x, y);
    return out;
}

struct Hit {
    hit: bool,
    distance: f32,
    point: vec3<f32>,
    normal: vec3<f32>,
};

fn intersect_sphere(origin: vec3<f32>, dir: vec3<f32>, center: vec3<f32>, radius: f32) -> Hit {
    var hit: Hit;
    hit.hit = false;
    let t = dot(center - origin, dir);
    let closest = origin + dir * t;
    let y = length(center - closest);
    if (y >= radius) {
        return hit;
    }
    let x = sqrt(radius * radius - y * y);
    hit.distance = t - x;
    if (hit.distance < 0.0) {
        return hit;
    }
    hit.point = origin + dir * hit.distance;
    hit.normal = (hit.point - center) / radius;
    hit.hit = true;
    return hit;
}

fn saturating_recip(v: vec3<f32>) -> vec3<f32> {
    let tiny = abs(v) < vec3<f32>(1.0 / RECIP_SATURATION);
    let saturated = select(
        vec3<f32>(RECIP_SATURATION),
        vec3<f32>(-RECIP_SATURATION),
        v < vec3<f32>(0.0)
    );
    return select(vec3<f32>(1.0) / v, saturated, tiny);
}

fn facing(d: f32) -> f32 {
    return select(-1.0, 1.0, d < 0.0);
}

fn intersect_aabb(
    origin: vec3<f32>,
    dir: vec3<f32>,
    center: vec3<f32>,
    half_extents: vec3<f32>,
) -> Hit {
    var hit: Hit;
    hit.hit = false;
    let m = saturating_recip(dir);
    let n = m * (origin - center);
    let k = abs(m) * half_extents;
    let t1 = -n - k;
    let t2 = -n + k;
    let t_near = max(max(t1.x, t1.y), t1.z);
    let t_far = min(min(t2.x, t2.y), t2.z);
    if (t_near > t_far || t_far < 0.0 || t_near < 0.0) {
        return hit;
    }

    var normal = vec3<f32>(0.0);
    if (t1.x >= t1.y && t1.x >= t1.z) {
        normal.x = facing(dir.x);
    } else if (t1.y >= t1.z) {
        normal.y = facing(dir.y);
    } else {
        normal.z = facing(dir.z);
    }

    hit.distance = t_near;
    hit.point = origin + dir * t_near;
    hit.normal = normal;
    hit.hit = true;
    return hit;
}

fn normal_color(n: vec3<f32>) -> vec4<f32> {
    if (frame.window.w > 0.5) {
        return vec4<f32>(n * 0.5 + vec3<f32>(0.5), 1.0);
    }
    return vec4<f32>(n, 1.0);
}

@fragment
fn fs_raycast(in: VertexOutput) -> @location(0) vec4<f32> {
    let screen = in.uv * 2.0 - vec2<f32>(1.0);
    let aspect = frame.window.z;
    let origin = frame.position.xyz;
    let dir = normalize(
        frame.right.xyz * screen.x * aspect +
        frame.up.xyz * screen.y +
        frame.forward.xyz
    );

    let surface = intersect_sphere(origin, dir, frame.sphere.xyz, frame.sphere.w);
    if (!surface.hit) {
        return frame.background_color;
    }

    let cell = intersect_aabb(origin, dir, round(surface.point), frame.cell_half_extents.xyz);
    if (!cell.hit) {
        return frame.surface_color;
    }
    return normal_color(cell.normal);
}
"#;

/// WGSL blit for frames produced on the CPU.
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var frame_texture: texture_2d<f32>;
@group(0) @binding(1)
var frame_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> VertexOutput {
    let x = f32((index << 1u) & 2u);
    let y = f32(index & 2u);
    var out: VertexOutput;
    out.clip_position = vec4<f32>(x * 2.0 - 1.0, y * 2.0 - 1.0, 0.0, 1.0);
    // Frame rows are stored top-down.
    out.uv = vec2<f32>(x, 1.0 - y);
    return out;
}

@fragment
fn fs_blit(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(frame_texture, frame_sampler, in.uv);
}
"#;
