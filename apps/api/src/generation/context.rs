//! Resume context — plain-text rendering of a `ResumeRecord` fed to the
//! cover-letter and HR-message prompts by `generate_all`.
//!
//! Output is deterministic for a given record. Sections with nothing to show
//! are omitted, header included.

use crate::generation::models::{LabeledFields, ResumeRecord};

const BULLET: &str = "•";

pub fn build_resume_context(resume: &ResumeRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Name: {}", resume.name));

    if let Some(contact) = render_contact(&resume.contact) {
        lines.push(format!("Contact: {contact}").trim_end().to_string());
    }

    if !resume.education.is_empty() {
        lines.push("\nEDUCATION:".to_string());
        for e in &resume.education {
            let gpa = if e.gpa.trim().is_empty() {
                "N/A"
            } else {
                e.gpa.as_str()
            };
            lines.push(format!(
                "  {} at {} ({}–{}) GPA: {}",
                e.degree, e.school, e.start, e.end, gpa
            ));
        }
    }

    let skills: Vec<(&str, &str)> = resume
        .skills
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect();
    if !skills.is_empty() {
        lines.push("\nSKILLS:".to_string());
        for (category, value) in skills {
            lines.push(format!("  {category}: {value}"));
        }
    }

    if !resume.experience.is_empty() {
        lines.push("\nEXPERIENCE:".to_string());
        for exp in &resume.experience {
            lines.push(format!(
                "  {} at {} ({}–{})",
                exp.title, exp.company, exp.start, exp.end
            ));
            push_bullets(&mut lines, &exp.bullets);
        }
    }

    if !resume.projects.is_empty() {
        lines.push("\nPROJECTS:".to_string());
        for p in &resume.projects {
            lines.push(format!("  {} ({})", p.name, p.tech));
            push_bullets(&mut lines, &p.bullets);
        }
    }

    lines.join("\n")
}

fn push_bullets(lines: &mut Vec<String>, bullets: &[String]) {
    lines.extend(bullets.iter().map(|b| format!("    {BULLET} {b}")));
}

/// `label: value` pairs in record order, blank values skipped. `None` only when
/// the mapping has no entries at all.
fn render_contact(contact: &LabeledFields) -> Option<String> {
    let mut entries = contact.iter().peekable();
    entries.peek()?;
    let parts: Vec<String> = entries
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();
    Some(parts.join(" | "))
}
