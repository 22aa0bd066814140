/// Uniform block shared by both shaders.
const UNIFORMS: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    tint: vec4<f32>,
    // xyz: unit direction towards the light, w: intensity
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var env_texture: texture_cube<f32>;
@group(1) @binding(1)
var env_sampler: sampler;
"#;

/// WGSL for the primitive meshes: environment reflection, tinted by the
/// material color and shaded by the directional light.
const MESH_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let view_dir = normalize(in.world_pos - uniforms.camera_pos.xyz);
    let reflected = reflect(view_dir, n);
    let env = textureSample(env_texture, env_sampler, reflected).rgb;

    let diffuse = max(dot(n, uniforms.light_dir.xyz), 0.0) * uniforms.light_dir.w;
    let lighting = 0.75 + 0.25 * diffuse;
    let color = env * uniforms.tint.rgb * uniforms.light_color.rgb * lighting;
    return vec4<f32>(color, 1.0);
}
"#;

/// WGSL for the background: a fullscreen triangle sampling the environment
/// along each pixel's view ray.
const ENV_BODY: &str = r#"
struct EnvOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_env(@builtin(vertex_index) index: u32) -> EnvOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    let ndc = uv * 2.0 - 1.0;

    var out: EnvOutput;
    out.clip_position = vec4<f32>(ndc, 1.0, 1.0);
    out.ndc = ndc;
    return out;
}

@fragment
fn fs_env(in: EnvOutput) -> @location(0) vec4<f32> {
    let far = uniforms.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let dir = normalize(far.xyz / far.w - uniforms.camera_pos.xyz);
    return vec4<f32>(textureSample(env_texture, env_sampler, dir).rgb, 1.0);
}
"#;

pub fn mesh_shader() -> String {
    format!("{UNIFORMS}{MESH_BODY}")
}

pub fn env_shader() -> String {
    format!("{UNIFORMS}{ENV_BODY}")
}
