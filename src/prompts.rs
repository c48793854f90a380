//! Prompt templates for the completion model

use crate::github::RepositorySnapshot;
use crate::util::truncate_chars;
use serde_json::Value;
use std::fmt::Write as _;

const README_CHAR_CAP: usize = 3000;
const FILE_PROMPT_CHAR_CAP: usize = 2000;
const MAX_FOLDERS_SHOWN: usize = 20;

/// Fixed instruction block establishing role and output-format constraints
pub fn system_prompt() -> &'static str {
    "You are an expert technical interviewer, resume consultant, and project evaluator.

Your task is to analyze GitHub repository information and generate high-quality, professional content for:
1. Project explanations suitable for interviews
2. Resume bullet points following best practices
3. Viva/oral examination questions with answers
4. Technical interview questions and answers

Guidelines:
- Base your analysis ONLY on the provided repository data
- Do not hallucinate or make up information
- Use professional, interview-appropriate language
- Be specific and technical where appropriate
- Format output as valid JSON matching the required schema
- Resume bullets should follow the STAR method (Situation, Task, Action, Result)
- Questions should range from easy to hard difficulty
- Interview questions should cover technical, architectural, and problem-solving aspects

Output ONLY valid JSON without any markdown formatting or additional text."
}

/// Data-filled user prompt for the full analysis
pub fn analysis_prompt(snapshot: &RepositorySnapshot) -> String {
    let mut files_section = String::new();
    if !snapshot.important_files.is_empty() {
        files_section.push_str("\n\n## KEY SOURCE FILES:\n");
        for (path, content) in &snapshot.important_files {
            let _ = write!(
                files_section,
                "\n### {path}\n```\n{}\n```\n",
                truncate_chars(content, FILE_PROMPT_CHAR_CAP)
            );
        }
    }

    let folders = snapshot
        .folder_structure
        .iter()
        .take(MAX_FOLDERS_SHOWN)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Analyze this GitHub repository and generate comprehensive interview/resume preparation materials.

## REPOSITORY INFORMATION:

**Repository:** {owner}/{repo}
**Total Files:** {total}

## FOLDER STRUCTURE:
{folders}

## README:
{readme}

{files_section}

## REQUIRED OUTPUT:

Generate a JSON object with the following structure:

",
        owner = snapshot.owner,
        repo = snapshot.repo_name,
        total = snapshot.total_files,
        readme = truncate_chars(&snapshot.readme, README_CHAR_CAP),
    );

    prompt.push_str(OUTPUT_SHAPE);
    prompt.push_str(
        "

IMPORTANT:
- Generate at least 5 resume bullets, 5 viva questions, and 5 interview Q&As
- Make questions progressively harder
- Base everything on actual repository content
- Use specific technical terms from the codebase
- Resume bullets should start with strong action verbs
- Include quantifiable metrics where possible
- Output ONLY the JSON object, no other text
",
    );
    prompt
}

/// Literal JSON shape the model must fill in
const OUTPUT_SHAPE: &str = r#"{
  "explanation": {
    "overview": "2-3 sentence high-level summary of the project",
    "key_features": ["feature1", "feature2", "feature3", ...],
    "tech_stack": ["technology1", "technology2", ...],
    "architecture": "Description of system architecture and design patterns used",
    "challenges_solved": ["challenge1", "challenge2", ...],
    "impact": "What problem does this solve and what value does it provide"
  },
  "resume_bullets": [
    {"point": "Action-oriented bullet point following STAR method"},
    {"point": "Another quantifiable achievement"},
    {"point": "Technical contribution highlighting skills"},
    {"point": "Impact-focused accomplishment"},
    {"point": "Complex problem solved"}
  ],
  "viva_questions": [
    {"question": "Easy conceptual question", "answer": "Clear answer", "difficulty": "easy"},
    {"question": "Medium question about implementation", "answer": "Detailed answer", "difficulty": "medium"},
    {"question": "Hard question about architecture/design", "answer": "Comprehensive answer", "difficulty": "hard"},
    {"question": "Another medium question", "answer": "Answer", "difficulty": "medium"},
    {"question": "Another hard question", "answer": "Answer", "difficulty": "hard"}
  ],
  "interview_qa": [
    {"question": "Technical question about implementation", "answer": "Sample answer", "category": "technical"},
    {"question": "Question about project challenges", "answer": "Sample answer", "category": "project-specific"},
    {"question": "Behavioral question about teamwork/decisions", "answer": "Sample answer", "category": "behavioral"},
    {"question": "Architecture/design question", "answer": "Sample answer", "category": "technical"},
    {"question": "Problem-solving scenario", "answer": "Sample answer", "category": "technical"}
  ]
}"#;

/// Fixed system prompt for the follow-up chat path
pub fn chat_system_prompt() -> &'static str {
    "You are a helpful assistant that answers questions about GitHub repositories.
Base your answers ONLY on the provided repository context. Be concise and accurate.
If the information is not in the context, say \"I don't have that information in the analysis.\"
Keep answers under 150 words."
}

/// User prompt for the chat path, built from client-supplied analysis context
pub fn chat_prompt(context: &Value, question: &str) -> String {
    let explanation = &context["explanation"];
    let join_list = |value: &Value| -> String {
        value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    };

    let repo_context = format!(
        "Repository: {owner}/{name}

Project Overview: {overview}

Key Features: {features}

Tech Stack: {stack}

Architecture: {architecture}

Challenges: {challenges}

Impact: {impact}
",
        owner = context["repo_owner"].as_str().unwrap_or_default(),
        name = context["repo_name"].as_str().unwrap_or_default(),
        overview = explanation["overview"].as_str().unwrap_or_default(),
        features = join_list(&explanation["key_features"]),
        stack = join_list(&explanation["tech_stack"]),
        architecture = explanation["architecture"].as_str().unwrap_or_default(),
        challenges = join_list(&explanation["challenges_solved"]),
        impact = explanation["impact"].as_str().unwrap_or_default(),
    );

    format!(
        "Context about the repository:
{repo_context}

User question: {question}

Provide a helpful, concise answer based on the context above."
    )
}
