use futures::future::join_all;
use tracing::{info, warn};

use crate::{
    errors::AppError,
    extract::extract_json_array,
    gateway::{preview, GatewayError, OutfitGateway},
    models::{Gender, Mood, Outfit},
};

pub const OUTFIT_COUNT: usize = 3;

pub fn build_outfit_prompt(gender: Gender, mood: Mood) -> String {
    format!(
        "You are a professional fashion stylist. Create {OUTFIT_COUNT} outfit suggestions for a {gender} person who wants to feel {mood}.

For each outfit, provide:
1. A brief title (e.g., \"Classic {label} Look\")
2. A detailed description of the outfit including specific items (top, bottom, shoes, accessories)
3. Style tips for pulling off this look
4. An image prompt that will be used to generate a fashion image

Return the response as a JSON array with exactly {OUTFIT_COUNT} outfits. Each outfit should have this structure:
{{
  \"title\": \"outfit title\",
  \"description\": \"detailed outfit description\",
  \"tips\": \"styling tips\",
  \"imagePrompt\": \"detailed prompt for image generation of this outfit on a fashion model\"
}}

Make the image prompts very detailed and specific, describing the exact clothing items, colors, textures, and styling. Always specify professional fashion photography style.",
        label = mood.label(),
    )
}

/// Runs the full pipeline: one text call, extraction, then one concurrent
/// image call per outfit. Only the first two stages can fail the request.
pub async fn generate_outfits(
    gateway: &dyn OutfitGateway,
    gender: Gender,
    mood: Mood,
) -> Result<Vec<Outfit>, AppError> {
    info!("🚀 Generating outfits for gender={} mood={}", gender, mood);

    let prompt = build_outfit_prompt(gender, mood);
    let reply = gateway.complete_text(&prompt).await.map_err(AppError::UpstreamText)?;
    info!("📥 Text reply received ({} chars)", reply.len());

    let mut outfits = extract_json_array(&reply).map_err(|e| {
        warn!("Unparseable model reply: {}", preview(&reply, 200));
        AppError::Parse(e)
    })?;
    if outfits.len() != OUTFIT_COUNT {
        warn!("⚠️ Model returned {} outfits, expected {}", outfits.len(), OUTFIT_COUNT);
        outfits.truncate(OUTFIT_COUNT);
    }

    let results = join_all(outfits.iter().map(|o| request_image(gateway, &o.image_prompt))).await;

    let outfits: Vec<Outfit> = outfits
        .into_iter()
        .zip(results)
        .enumerate()
        .map(|(index, (mut outfit, result))| {
            match result {
                Ok(Some(url)) => outfit.image_url = Some(url),
                Ok(None) => warn!("⚠️ Outfit {} ('{}') has no image", index, outfit.title),
                Err(e) => warn!(
                    "❌ Image generation failed for outfit {} ('{}'): {}",
                    index, outfit.title, e
                ),
            }
            outfit
        })
        .collect();

    let with_images = outfits.iter().filter(|o| o.image_url.is_some()).count();
    info!("✅ Generated {} outfits, {} with images", outfits.len(), with_images);
    Ok(outfits)
}

async fn request_image(
    gateway: &dyn OutfitGateway,
    prompt: &str,
) -> Result<Option<String>, GatewayError> {
    if prompt.trim().is_empty() {
        return Ok(None);
    }
    gateway.generate_image(prompt).await
}
