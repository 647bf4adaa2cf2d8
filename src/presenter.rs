//! Presentation state for content-kit results.
//!
//! Models the client-side behavior as data: loading-phase sequencing, which
//! tab a fresh result opens on, what the image pane shows, and which text
//! field a copy action targets. The `kitctl` binary drives these to render a
//! kit in the terminal; a browser front end would map them onto the DOM.
use crate::kit::types::GenerationResult;

/// Progress through one generation request. The image phase only appears
/// when the request actually asked for an image provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    GeneratingText,
    GeneratingImage,
    Done,
}

impl LoadingPhase {
    pub fn start() -> Self {
        LoadingPhase::GeneratingText
    }

    pub fn advance(self, image_requested: bool) -> Self {
        match self {
            LoadingPhase::GeneratingText if image_requested => LoadingPhase::GeneratingImage,
            LoadingPhase::GeneratingText => LoadingPhase::Done,
            LoadingPhase::GeneratingImage | LoadingPhase::Done => LoadingPhase::Done,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadingPhase::GeneratingText => "Generating text...",
            LoadingPhase::GeneratingImage => "Generating image...",
            LoadingPhase::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Article,
    Social,
    Image,
}

/// What the image pane shows: a generated image, the literal reported
/// failure, or the generic placeholder when no generation was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePane {
    Image(String),
    Failed(String),
    Placeholder,
}

impl ImagePane {
    pub fn message(&self) -> &str {
        match self {
            ImagePane::Image(_) => "",
            ImagePane::Failed(message) => message,
            ImagePane::Placeholder => {
                "No image generated. Select an image provider to include one."
            }
        }
    }
}

/// The four copyable text fields. Each copy action targets exactly one and
/// can be repeated any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyField {
    Markdown,
    Html,
    MediumCopy,
    LinkedinCopy,
}

pub fn copy_text(result: &GenerationResult, field: CopyField) -> &str {
    match field {
        CopyField::Markdown => &result.article_markdown,
        CopyField::Html => &result.article_html,
        CopyField::MediumCopy => &result.medium_copy,
        CopyField::LinkedinCopy => &result.linkedin_copy,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub image_pane: ImagePane,
}

impl ViewState {
    /// A fresh result always opens on the article tab.
    pub fn from_result(result: &GenerationResult) -> Self {
        let image_pane = match (&result.image_url, &result.image_error) {
            (Some(url), _) => ImagePane::Image(url.clone()),
            (None, Some(error)) => {
                ImagePane::Failed(format!("Image generation failed: {}", error))
            }
            (None, None) => ImagePane::Placeholder,
        };
        ViewState {
            active_tab: Tab::Article,
            image_pane,
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(image_url: Option<&str>, image_error: Option<&str>) -> GenerationResult {
        GenerationResult {
            success: true,
            article_markdown: "# md".to_string(),
            article_html: "<div>html</div>".to_string(),
            image_prompt: "prompt".to_string(),
            image_url: image_url.map(String::from),
            image_error: image_error.map(String::from),
            medium_copy: "medium".to_string(),
            linkedin_copy: "linkedin".to_string(),
        }
    }

    #[test]
    fn phases_skip_image_when_not_requested() {
        let phase = LoadingPhase::start();
        assert_eq!(phase, LoadingPhase::GeneratingText);
        assert_eq!(phase.advance(false), LoadingPhase::Done);
    }

    #[test]
    fn phases_pass_through_image_when_requested() {
        let phase = LoadingPhase::start().advance(true);
        assert_eq!(phase, LoadingPhase::GeneratingImage);
        assert_eq!(phase.advance(true), LoadingPhase::Done);
    }

    #[test]
    fn done_is_terminal() {
        assert_eq!(LoadingPhase::Done.advance(true), LoadingPhase::Done);
    }

    #[test]
    fn fresh_result_opens_on_article_tab() {
        let view = ViewState::from_result(&result(None, None));
        assert_eq!(view.active_tab, Tab::Article);
    }

    #[test]
    fn image_pane_shows_literal_failure_message() {
        let view = ViewState::from_result(&result(None, Some("quota exhausted")));
        assert_eq!(
            view.image_pane,
            ImagePane::Failed("Image generation failed: quota exhausted".to_string())
        );
    }

    #[test]
    fn image_pane_placeholder_when_nothing_attempted() {
        let view = ViewState::from_result(&result(None, None));
        assert_eq!(view.image_pane, ImagePane::Placeholder);
        assert!(view.image_pane.message().contains("No image generated"));
    }

    #[test]
    fn image_pane_prefers_url() {
        let view = ViewState::from_result(&result(Some("data:image/png;base64,AA=="), None));
        assert_eq!(
            view.image_pane,
            ImagePane::Image("data:image/png;base64,AA==".to_string())
        );
    }

    #[test]
    fn copy_targets_exactly_one_field() {
        let result = result(None, None);
        assert_eq!(copy_text(&result, CopyField::Markdown), "# md");
        assert_eq!(copy_text(&result, CopyField::Html), "<div>html</div>");
        assert_eq!(copy_text(&result, CopyField::MediumCopy), "medium");
        assert_eq!(copy_text(&result, CopyField::LinkedinCopy), "linkedin");
        // Repeat copies read the same field again.
        assert_eq!(copy_text(&result, CopyField::Markdown), "# md");
    }
}
