//! Prompt template and composition for generation requests

use crate::models::BackgroundMode;
use crate::poses::Pose;

/// Core editorial prompt. The background and pose placeholders are filled per
/// request; everything else is fixed wording the service is tuned against.
pub const CORE_PROMPT_TEMPLATE: &str = r#"
You are a high-end fashion editorial image generator for VM STYLING STUDIO.

GOAL
Create a full-body standing fashion photo of ONE consistent model identity, following the selected pose ID and styling reference.

HARD VISION LOCKS (MUST FOLLOW OR FAIL):
1) Identity: The face identity MUST match the provided face reference exactly. Do not change facial structure, age, ethnicity, or expression style.
2) Garment Color & Fit (CRITICAL): Clothing items MUST exactly match the uploaded garment images (top, bottom, shoes, sunglasses) in color, design, logos, patterns, stitching, silhouette, and fit. DO NOT alter the color in any lighting condition. The fit must be precisely true to the provided reference images without redesigning anything.
3) Accessories: STRICTLY use ONLY the provided accessory images. If a specific accessory category is NOT provided, the subject MUST be bare of that item. Do not add unrequested items to "complete the look."
4) Body Spec: 8.5-head proportion, supermodel physique, idealized long legs with smooth clean lines, elegant posture, fashion-forward.
5) Clean Output: NO text, NO watermark, NO countdown overlay, NO UI elements embedded in the image.

PHOTOGRAPHY & COMPOSITION QUALITY:
- Full-body, standing pose, head-to-toe visible, centered or slightly off-center editorial framing.
- Resolution & Details: 高清分辨率 (High-res), 超清细节表现 (hyper-detailed).
- Style & Mood: 专业时尚摄影风格 (professional fashion photography), 杂志封面级质感 (magazine cover quality), 国际一线大片水准 (international blockbuster level).
- Skin & Texture: 逼真的皮肤质感 (realistic skin texture), no plastic skin.
- Lighting: 柔和均匀的光线布局 (soft even lighting), 电影级别的光影效果 (cinematic lighting), refined shadows. 
- Appearance: Ultra high resolution, 4K look, luxury, clean, no blur, no noise.

- Background mode: {{background_mode}}
  - if white: pure white seamless studio background, even soft lighting, minimal shadows.
  - if keep_original: preserve the styling reference background as much as possible (no messy artifacts).

POSE ENFORCEMENT
Current Request Pose: {{pose_id}} - {{pose_description}}.
The output MUST strictly follow this pose description.

INPUTS PROVIDED
I will provide the images labeled by their category below.
"#;

/// Quality guard appended after the core prompt on every request
pub const NEGATIVE_PROMPT: &str = r#"
Avoid: low quality, blurry, noisy, oversaturated, neon colors, cheap gradients, messy shadows, distorted anatomy, extra fingers, warped face, changed identity, changed garment design, changed garment color (CRITICAL), missing clothing items, added random accessories, unrequested jewelry, bags, hats, belts, text, watermark, logo overlay, UI overlay, countdown, stickers, heavy filters, plastic skin, cartoon/anime style, CGI look, background clutter.
"#;

/// Fills the template for one pose and appends the negative prompt.
///
/// Deterministic: the same mode and pose always yield the same text.
pub fn compose_prompt(background_mode: BackgroundMode, pose: &Pose) -> String {
    let prompt = CORE_PROMPT_TEMPLATE
        .replace("{{background_mode}}", background_mode.as_str())
        .replace("{{pose_id}}", pose.id)
        .replace("{{pose_description}}", pose.description);
    format!("{}\n{}", prompt, NEGATIVE_PROMPT)
}
