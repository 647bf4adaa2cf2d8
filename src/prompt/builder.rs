//! System and user prompt assembly for the publishing kit.
//!
//! The system prompt pins the model to AEO-structured output and a strict
//! four-key JSON contract. Two parts are conditional: a fixed guidance block
//! injected when the topic touches a sensitive (health) domain, and the
//! contact-section instruction derived from which contact fields the request
//! carries.
use crate::kit::types::GenerationRequest;

/// Terms that mark a topic/business combination as health-related. Matched
/// case-insensitively as substrings, so `deficien` covers both "deficiency"
/// and "deficiencies".
const SENSITIVE_TERMS: &[&str] = &[
    "health",
    "medical",
    "disease",
    "nutrition",
    "supplement",
    "vitamin",
    "mineral",
    "wellness",
    "diet",
    "symptom",
    "treatment",
    "cure",
    "doctor",
    "patient",
    "body",
    "immune",
    "chronic",
    "deficien",
];

const HEALTH_GUIDANCE: &str = "
IMPORTANT - For health-related content, follow these principles from the Triangle of Disease framework:
- Focus on nutritional deficiencies as root causes of health issues
- Emphasize the importance of the 90 essential nutrients (60 minerals, 16 vitamins, 12 amino acids, 2-3 essential fatty acids)
- Reference how mineral depletion in soil affects food nutrition
- Discuss how the body can heal itself when given proper nutrition
- Avoid making direct medical claims; instead focus on nutritional support
- Reference the connection between specific nutrients and body systems
- Connect symptoms to potential mineral deficiencies
- Do NOT include links to triangleofdisease.com or iwhhealthhub.com in the generated content
";

pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl PromptPair {
    /// Single user turn sent to the text model.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system_prompt, self.user_prompt)
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        PromptBuilder
    }

    pub fn build(&self, request: &GenerationRequest) -> PromptPair {
        let topic = request.topic().unwrap_or_default();
        let business_type = request.business_type().unwrap_or_default();

        let guidance = if is_sensitive_domain(topic, business_type) {
            HEALTH_GUIDANCE
        } else {
            ""
        };

        let system_prompt = format!(
            "You are an AEO (Answer Engine Optimization) expert. Generate content structured for AI search engines like ChatGPT, Perplexity, and Google AI Overviews.\n\
            {guidance}\n\
            Your content MUST follow these AEO principles:\n\
            - Start each H2 section with a **bolded direct answer** in the first sentence\n\
            - Use frequent bulleted and numbered lists\n\
            - Include high entity density (specific names, numbers, facts)\n\
            - Write in a clear, authoritative tone\n\
            - Structure content to be easily extractable by AI systems\n\
            \n\
            You must output ONLY a valid JSON object (no markdown code blocks, no extra text) with these exact keys:\n\
            \n\
            {{\n\
            \x20 \"articleMarkdown\": \"The full blog post in Markdown format. Include a compelling H1 title, multiple H2 sections with bolded direct answers, lists, and actionable content. {contact}\",\n\
            \x20 \"imagePrompt\": \"A detailed, photographic prompt for generating an image relevant to the article. Describe the scene, lighting, style, and key visual elements. Make it professional and suitable for a business blog.\",\n\
            \x20 \"mediumCopy\": \"A formatted block for Medium with:\\\\n\\\\nTITLE: [Compelling title]\\\\n\\\\nSUBTITLE: [Engaging subtitle that hooks readers]\\\\n\\\\n[First 2-3 paragraphs of the article, optimized for Medium's audience]\",\n\
            \x20 \"linkedinCopy\": \"A short, engaging LinkedIn post (under 1300 characters) summarizing the key insights. Include:\\\\n- 2-3 relevant emojis\\\\n- A hook in the first line\\\\n- 3-5 bullet points of key takeaways\\\\n- A call to action\\\\n- 5-7 relevant hashtags\"\n\
            }}",
            guidance = guidance,
            contact = contact_instruction(request),
        );

        let mut user_prompt = format!(
            "Create an AEO-optimized publishing kit for:\n\n\
            Topic/Question: {topic}\n\
            Business Type/Industry: {business_type}\n"
        );
        if let Some(url) = request.website_url() {
            user_prompt.push_str(&format!("Website URL: {url}\n"));
        }
        if let Some(url) = request.booking_url() {
            user_prompt.push_str(&format!("Booking/Evaluation URL: {url}\n"));
        }
        if let Some(phone) = request.phone() {
            user_prompt.push_str(&format!("Phone Number: {phone}\n"));
        }
        user_prompt.push_str(
            "\nGenerate comprehensive, valuable content that positions the business as an authority in their field.",
        );

        PromptPair {
            system_prompt,
            user_prompt,
        }
    }
}

fn is_sensitive_domain(topic: &str, business_type: &str) -> bool {
    let haystack = format!("{} {}", topic, business_type).to_lowercase();
    SENSITIVE_TERMS.iter().any(|term| haystack.contains(term))
}

/// Contact-section instruction embedded in the articleMarkdown contract: list
/// only the fields that are present, or forbid the section outright.
fn contact_instruction(request: &GenerationRequest) -> String {
    let mut pieces = Vec::new();
    if let Some(url) = request.website_url() {
        pieces.push(format!("Website link: [Visit Our Website]({url})"));
    }
    if let Some(url) = request.booking_url() {
        pieces.push(format!("Booking link: [Schedule a Consultation]({url})"));
    }
    if let Some(phone) = request.phone() {
        pieces.push(format!("Phone: {phone}"));
    }
    if pieces.is_empty() {
        return "Do NOT include a Contact Us section.".to_string();
    }
    format!(
        "End with a '## Contact Us' section. Format URLs as clickable markdown links like [Visit Our Website](url). Include: {}",
        pieces.join(" ")
    )
}
