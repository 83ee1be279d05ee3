//! Prompt construction for the two discovery paths.

use std::sync::OnceLock;

use regex::Regex;

use clipscout_models::VideoRef;

/// Scan an instruction for a `H:MM:SS` / `MM:SS` shaped time hint.
///
/// Only the first timestamp-shaped substring counts; later ones are
/// ignored. Returns total seconds.
pub fn extract_time_hint(instruction: &str) -> Option<u64> {
    static TIME_HINT: OnceLock<Regex> = OnceLock::new();
    let re = TIME_HINT.get_or_init(|| {
        Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").expect("time hint regex is valid")
    });

    let caps = re.captures(instruction)?;
    let first: u64 = caps[1].parse().ok()?;
    let second: u64 = caps[2].parse().ok()?;

    match caps.get(3) {
        Some(third) => {
            let third: u64 = third.as_str().parse().ok()?;
            Some(first * 3600 + second * 60 + third)
        }
        None => Some(first * 60 + second),
    }
}

/// Prompt for bulk discovery: propose 5-8 candidate moments.
pub fn build_bulk_prompt(video: &VideoRef) -> String {
    format!(
        r#"You are an expert TikTok content analyst with deep knowledge of what makes videos go viral on social platforms.
You're analyzing this YouTube video: {url} (Video ID: {id})

I know you cannot actually watch the video, but I need you to use your knowledge of viral content to identify potential funny moments that could be extracted as TikTok clips.

You should think like a professional content creator who knows:
1. The exact types of moments that perform well on TikTok (surprising reactions, funny fails, clever comebacks, etc.)
2. How to identify the perfect clip length (typically 8-30 seconds)
3. Where natural "cut points" should be in a video for maximum humor impact
4. What kind of captions generate high engagement

Generate 5-8 moments that would be perfect for TikTok clips. For each moment, follow these guidelines:

1. REALISTIC MOMENTS: Infer plausible funny moments based on the video title, channel type, and common structures in viral videos
2. PRECISE TIMESTAMPS: Create mathematically correct timestamps that represent realistic video segments
3. VARIED HUMOR TYPES: Include different kinds of humor (reaction shots, slapstick, verbal humor, unexpected moments)
4. VIRAL POTENTIAL: Focus on moments that would genuinely generate interest and shares
5. PERFECT DURATION: Keep clip durations between 8-30 seconds (ideal for TikTok)

Provide details for each moment in a JSON array within a root JSON object named 'funniest_moments_list'.

Each object should have:
{{
  "moment_id": number (sequential starting from 1),
  "description": "A specific, detailed description of exactly what happens in this funny moment",
  "timestamp_start": "HH:MM:SS" (precise timestamp where the funny moment begins),
  "timestamp_end": "HH:MM:SS" (precise timestamp where the funny moment ends - typically 8-30 seconds later),
  "duration_seconds": number (calculated exactly from timestamps),
  "why_its_tiktok_funny": "Detailed explanation of why this specific moment would work well on TikTok, including the humor type and audience appeal",
  "suggested_caption_hook": "An attention-grabbing caption that would drive engagement"
}}

Return ONLY the JSON object without any additional text or markdown formatting. Ensure timestamps and duration calculations are mathematically correct.
"#,
        url = video.source_url,
        id = video.video_id,
    )
}

/// Prompt for targeted discovery: find the one moment the user described.
pub fn build_targeted_prompt(video: &VideoRef, instruction: &str, moment_id: u64) -> String {
    let time_hint_text = match extract_time_hint(instruction) {
        Some(hint) => format!(
            "The user mentioned a timestamp around {}:{:02}. Focus your search near this timestamp.",
            hint / 60,
            hint % 60
        ),
        None => {
            "No specific timestamp was mentioned, so estimate where this moment might occur based on the description."
                .to_string()
        }
    };

    format!(
        r#"You are an expert TikTok content analyst who specializes in finding the perfect viral moments in videos.

I need you to find a specific moment in this YouTube video: {url} (Video ID: {id})

The user is looking for: "{instruction}"

{time_hint_text}

Even though you cannot actually watch the video, analyze the request and use your expertise to:

1. PRECISE INTERPRETATION: Determine exactly what kind of moment the user is looking for
2. ACCURATE TIMING: Estimate when this moment would occur in the video
3. PERFECT DURATION: Create a clip of just the right length (between 5-15 seconds) to capture the essence of the moment
4. VIRAL POTENTIAL: Explain why this specific moment would perform well on TikTok
5. ENGAGING CAPTION: Create a caption that would make viewers want to engage with the content

Please provide a JSON object for this specific moment with:
{{
  "moment_id": {moment_id},
  "description": "A precise, detailed description of exactly what happens in this moment",
  "timestamp_start": "HH:MM:SS" (the exact time where the moment begins),
  "timestamp_end": "HH:MM:SS" (the time where the moment ends, creating a perfect clip),
  "duration_seconds": number (calculated exactly from timestamps),
  "why_its_tiktok_funny": "A detailed explanation of why this specific moment would perform well on TikTok, focusing on virality factors",
  "suggested_caption_hook": "An attention-grabbing, engaging caption that would drive likes and shares"
}}

Return ONLY the JSON object with no additional text. Ensure timestamps are mathematically correct and follow the HH:MM:SS format.
"#,
        url = video.source_url,
        id = video.video_id,
    )
}
