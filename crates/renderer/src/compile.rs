use std::borrow::Cow;

use wgpu::naga::ShaderStage;

pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("slider quad vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(vertex_source()),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("displacement fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(fragment_source()),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

fn vertex_source() -> String {
    format!("#version 450\n{PARAMS_BLOCK}{VERTEX_BODY}")
}

fn fragment_source() -> String {
    format!("#version 450\n{PARAMS_BLOCK}{FRAGMENT_BODY}")
}

/// Layout must match [`crate::material::GpuUniforms`].
const PARAMS_BLOCK: &str = r"layout(std140, set = 0, binding = 0) uniform SliderParams {
    mat4 viewProjection;
    vec2 resolution;
    float dispPower;
    float intensity;
} params;
";

const VERTEX_BODY: &str = r"
layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;
layout(location = 0) out vec2 v_uv;

void main() {
    v_uv = uv;
    gl_Position = params.viewProjection * vec4(position, 1.0);
}
";

/// Crossfade between two slides, each sampled at coordinates pushed in
/// opposite directions by the displacement map.
const FRAGMENT_BODY: &str = r"
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(set = 1, binding = 0) uniform texture2D texture1;
layout(set = 1, binding = 1) uniform sampler sampler1;
layout(set = 1, binding = 2) uniform texture2D texture2;
layout(set = 1, binding = 3) uniform sampler sampler2;
layout(set = 1, binding = 4) uniform texture2D dispTexture;
layout(set = 1, binding = 5) uniform sampler dispSampler;

// Scales uv so the texture covers the viewport without stretching.
vec2 cover(vec2 uv, vec2 texSize) {
    float viewAspect = params.resolution.x / max(params.resolution.y, 1.0);
    float textureAspect = texSize.x / max(texSize.y, 1.0);
    vec2 scale = vec2(viewAspect / textureAspect, 1.0);
    if (viewAspect > textureAspect) {
        scale = vec2(1.0, textureAspect / viewAspect);
    }
    return (uv - 0.5) * scale + 0.5;
}

void main() {
    vec2 uv = v_uv;
    vec4 disp = texture(sampler2D(dispTexture, dispSampler), uv);
    vec2 dispVec = vec2(disp.r, disp.g);

    vec2 distPos1 = uv + dispVec * params.intensity * params.dispPower;
    vec2 distPos2 = uv + dispVec * -(params.intensity * (1.0 - params.dispPower));

    vec2 size1 = vec2(textureSize(sampler2D(texture1, sampler1), 0));
    vec2 size2 = vec2(textureSize(sampler2D(texture2, sampler2), 0));
    vec4 color1 = texture(sampler2D(texture1, sampler1), cover(distPos1, size1));
    vec4 color2 = texture(sampler2D(texture2, sampler2), cover(distPos2, size2));

    outColor = mix(color1, color2, params.dispPower);
}
";
