//! DOCX and PDF rendering of analysis results

use crate::error::{AnalyzerError, Result};
use crate::schema::{AnalysisResult, Category, Difficulty};
use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::io::Cursor;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 15.0;
const WRAP_COLUMNS: usize = 95;

fn difficulty_tag(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "EASY",
        Difficulty::Medium => "MEDIUM",
        Difficulty::Hard => "HARD",
    }
}

fn category_tag(category: Category) -> &'static str {
    match category {
        Category::Technical => "TECHNICAL",
        Category::Behavioral => "BEHAVIORAL",
        Category::ProjectSpecific => "PROJECT-SPECIFIC",
    }
}

/// Renders the analysis as a DOCX document
pub fn render_docx(data: &AnalysisResult) -> Result<Vec<u8>> {
    let mut doc = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!("{}/{}", data.repo_owner, data.repo_name))
                        .bold()
                        .size(48),
                )
                .align(AlignmentType::Center),
        )
        .add_paragraph(heading2("GitHub Repository Analysis"))
        .add_paragraph(heading1("Project Overview"))
        .add_paragraph(body(&data.explanation.overview))
        .add_paragraph(heading2("Key Features"));

    for feature in &data.explanation.key_features {
        doc = doc.add_paragraph(bullet(feature));
    }

    doc = doc
        .add_paragraph(heading2("Tech Stack"))
        .add_paragraph(body(&data.explanation.tech_stack.join(", ")))
        .add_paragraph(heading2("Architecture"))
        .add_paragraph(body(&data.explanation.architecture))
        .add_paragraph(heading2("Challenges Solved"));

    for challenge in &data.explanation.challenges_solved {
        doc = doc.add_paragraph(bullet(challenge));
    }

    doc = doc
        .add_paragraph(heading2("Impact"))
        .add_paragraph(body(&data.explanation.impact))
        .add_paragraph(page_break())
        .add_paragraph(heading1("Resume Bullet Points"));

    for item in &data.resume_bullets {
        doc = doc.add_paragraph(bullet(&item.point));
    }

    doc = doc.add_paragraph(page_break()).add_paragraph(heading1("Viva Questions"));
    for (i, viva) in data.viva_questions.iter().enumerate() {
        doc = doc
            .add_paragraph(heading2(&format!(
                "Q{} [{}]",
                i + 1,
                difficulty_tag(viva.difficulty)
            )))
            .add_paragraph(body(&format!("Question: {}", viva.question)))
            .add_paragraph(body(&format!("Answer: {}", viva.answer)));
    }

    doc = doc
        .add_paragraph(page_break())
        .add_paragraph(heading1("Interview Questions & Answers"));
    for (i, qa) in data.interview_qa.iter().enumerate() {
        doc = doc
            .add_paragraph(heading2(&format!("Q{} [{}]", i + 1, category_tag(qa.category))))
            .add_paragraph(body(&format!("Question: {}", qa.question)))
            .add_paragraph(body(&format!("Answer: {}", qa.answer)));
    }

    let mut buffer = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buffer)
        .map_err(|e| AnalyzerError::ExportFailed(format!("DOCX packaging failed: {e}")))?;
    Ok(buffer.into_inner())
}

fn heading1(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(32))
}

fn heading2(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(26))
}

fn body(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn bullet(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(format!("• {text}")))
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

/// Renders the analysis as a PDF document (builtin Helvetica fonts)
pub fn render_pdf(data: &AnalysisResult) -> Result<Vec<u8>> {
    let title = format!("{}/{}", data.repo_owner, data.repo_name);
    let mut writer = PdfWriter::new(&title)?;

    writer.heading(&title, 20.0);
    writer.heading("GitHub Repository Analysis", 14.0);
    writer.blank();

    writer.heading("Project Overview", 14.0);
    writer.paragraph(&data.explanation.overview);
    writer.heading("Key Features", 12.0);
    for feature in &data.explanation.key_features {
        writer.paragraph(&format!("• {feature}"));
    }
    writer.heading("Tech Stack", 12.0);
    writer.paragraph(&data.explanation.tech_stack.join(", "));
    writer.heading("Architecture", 12.0);
    writer.paragraph(&data.explanation.architecture);
    writer.heading("Challenges Solved", 12.0);
    for challenge in &data.explanation.challenges_solved {
        writer.paragraph(&format!("• {challenge}"));
    }
    writer.heading("Impact", 12.0);
    writer.paragraph(&data.explanation.impact);

    writer.new_page();
    writer.heading("Resume Bullet Points", 14.0);
    for item in &data.resume_bullets {
        writer.paragraph(&format!("• {}", item.point));
    }

    writer.new_page();
    writer.heading("Viva Questions", 14.0);
    for (i, viva) in data.viva_questions.iter().enumerate() {
        writer.heading(
            &format!("Q{} [{}]", i + 1, difficulty_tag(viva.difficulty)),
            12.0,
        );
        writer.paragraph(&format!("Question: {}", viva.question));
        writer.paragraph(&format!("Answer: {}", viva.answer));
    }

    writer.new_page();
    writer.heading("Interview Questions & Answers", 14.0);
    for (i, qa) in data.interview_qa.iter().enumerate() {
        writer.heading(&format!("Q{} [{}]", i + 1, category_tag(qa.category)), 12.0);
        writer.paragraph(&format!("Question: {}", qa.question));
        writer.paragraph(&format!("Answer: {}", qa.answer));
    }

    writer.finish()
}

/// Cursor-tracking line writer over printpdf pages
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AnalyzerError::ExportFailed(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AnalyzerError::ExportFailed(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn advance(&mut self, line_height: f32) {
        if self.y - line_height < MARGIN_MM {
            self.new_page();
        }
        self.y -= line_height;
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.advance(size * 0.6);
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.advance(3.0);
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_COLUMNS) {
            self.advance(5.0);
            self.layer
                .use_text(line, 11.0, Mm(MARGIN_MM), Mm(self.y), &self.regular);
        }
        self.advance(2.0);
    }

    fn blank(&mut self) {
        self.advance(5.0);
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| AnalyzerError::ExportFailed(e.to_string()))
    }
}

/// Greedy word wrap; overlong single words are hard-broken
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        while current.chars().count() > width {
            let head: String = current.chars().take(width).collect();
            let tail: String = current.chars().skip(width).collect();
            lines.push(head);
            current = tail;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InterviewQa, ProjectExplanation, ResumeBullet, VivaQuestion};

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            repo_name: "whisper".into(),
            repo_owner: "openai".into(),
            explanation: ProjectExplanation {
                overview: "A general-purpose speech recognition model.".into(),
                key_features: vec!["Transcription".into(), "Translation".into()],
                tech_stack: vec!["Python".into(), "PyTorch".into()],
                architecture: "Encoder-decoder transformer trained on diverse audio.".into(),
                challenges_solved: vec!["Robustness to accents and noise".into()],
                impact: "Makes accurate speech recognition broadly accessible.".into(),
            },
            resume_bullets: vec![ResumeBullet {
                point: "Developed a multilingual ASR model achieving state-of-the-art robustness"
                    .into(),
            }],
            viva_questions: vec![VivaQuestion {
                question: "What is an encoder-decoder architecture?".into(),
                answer: "A model with separate encoding and decoding stages.".into(),
                difficulty: Difficulty::Easy,
            }],
            interview_qa: vec![InterviewQa {
                question: "How would you scale inference?".into(),
                answer: "Batching and quantization.".into(),
                category: Category::Technical,
            }],
        }
    }

    #[test]
    fn docx_output_is_a_zip_container() {
        let bytes = render_docx(&sample_result()).unwrap();
        assert!(bytes.len() > 1000);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn pdf_output_has_pdf_magic() {
        let bytes = render_pdf(&sample_result()).unwrap();
        assert!(bytes.len() > 500);
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn wrap_breaks_long_paragraphs() {
        let text = "word ".repeat(50);
        let lines = wrap_text(&text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn wrap_hard_breaks_overlong_words() {
        let lines = wrap_text(&"x".repeat(45), 20);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 20), vec![String::new()]);
    }
}
