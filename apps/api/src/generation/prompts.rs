// Prompt templates and builders for the three document types.
// Templates go through llm_client::prompts::render_template; builders are pure
// and deterministic for identical inputs.

use crate::llm_client::prompts::render_template;

/// Sentence the HR message must contain word for word.
pub const HR_BRIEF_INTRO: &str = "I know you likely receive a lot of messages like this, \
    so I'll keep it very brief — just a quick introduction.";

pub const COMPANY_NAME_PLACEHOLDER: &str = "[Company Name]";
pub const POSITION_PLACEHOLDER: &str = "this position";
pub const RECRUITER_PLACEHOLDER: &str = "[Recruiter Name]";
pub const COMPANY_PLACEHOLDER: &str = "[Company]";
pub const ROLE_PLACEHOLDER: &str = "this role";

/// Resume rewrite prompt. Replace: {resume_text}, {jd_text}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert ATS resume writer. Rewrite this resume to be perfectly tailored for the job description.

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}

RULES:
1. Use ONLY real facts from the resume. Never invent anything.
2. Missing fields get placeholders like [Start Date], [GPA], [City].
3. Every work experience bullet MUST follow: "Accomplished [X result] through [Y action] using [Z tool/technology]"
4. EXACTLY 3 bullets per work experience. EXACTLY 2 bullets per project.
5. Weave JD keywords naturally throughout. List JD-matching skills first.
6. Return ats_score (integer 75-95) and matched_keywords (6-10 phrases from JD now in resume).

Return ONLY this JSON — no markdown, no explanation:

{
  "name": "Full Name",
  "contact": {
    "phone": "...", "email": "...", "linkedin": "...", "github": "...", "location": "..."
  },
  "education": [{
    "degree": "...", "school": "...", "location": "...",
    "start": "...", "end": "...", "gpa": "...", "coursework": "..."
  }],
  "skills": {
    "Languages": "...", "Frameworks": "...", "Databases": "...",
    "Tools": "...", "Cloud": "...", "Other": "..."
  },
  "experience": [{
    "title": "...", "company": "...", "location": "...",
    "start": "...", "end": "...", "tech": "...",
    "bullets": ["Accomplished X through Y using Z", "...", "..."]
  }],
  "projects": [{
    "name": "...", "tech": "...", "link": "...",
    "bullets": ["Accomplished X through Y using Z", "..."]
  }],
  "ats_score": 88,
  "matched_keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5", "keyword6"]
}"#;

/// Cover letter prompt. Replace: {resume_context}, {jd_text}, {company}, {role}
///
/// The `\n` sequences in RULES are literal backslash-n: they tell the model where
/// the line breaks go.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert cover letter writer. Write a compelling, personalized cover letter.

CANDIDATE RESUME:
{resume_context}

JOB DESCRIPTION:
{jd_text}

COMPANY: {company}
ROLE: {role}

STRUCTURE:
Paragraph 1 — HOOK: Don't start with "I am writing to express my interest". Open with something genuine and specific about why this role excites you.
Paragraph 2 — EVIDENCE: 2-3 specific quantified achievements from the resume that directly map to JD requirements.
Paragraph 3 — FIT: Show you understand what this team needs and what you uniquely bring.
Paragraph 4 — CLOSE: Confident, warm sign-off. Invite next steps.

RULES:
- 300-380 words total
- Start with: [Today's Date]\nDear Hiring Manager,
- End with: Sincerely,\n[Candidate Name]
- No clichés: "I am writing to", "I believe I would be a great fit", "To whom it may concern"
- Warm, direct, professional tone

Return ONLY the cover letter text. Nothing else."#;

/// HR outreach prompt.
/// Replace: {resume_context}, {jd_text}, {recruiter_name}, {company}, {role},
///          {at_company}, {brief_intro}
pub const HR_MESSAGE_PROMPT_TEMPLATE: &str = r#"Write a short cold outreach message for LinkedIn or email.

CANDIDATE RESUME:
{resume_context}

JOB DESCRIPTION:
{jd_text}

RECRUITER: {recruiter_name}
COMPANY: {company}
ROLE: {role}

USE THIS EXACT FORMAT:

Hi {recruiter_name},

{brief_intro}

I'm a [job title] with experience in [2-3 core skills matching JD], and I was excited to see the {role} role{at_company}. Here's how my experience aligns:

• [Real achievement from resume — under 20 words — matches JD requirement 1]
• [Real achievement from resume — under 20 words — matches JD requirement 2]
• [Real achievement from resume — under 20 words — matches JD requirement 3]

If helpful, I'd be happy to share more context or a project demo alongside my resume. Would that be okay?

Thank you for your time,
[Candidate Full Name]

STRICT RULES:
1. The line "{brief_intro}" must appear EXACTLY as written.
2. Each bullet under 20 words.
3. Use REAL achievements from the resume.
4. Total message under 150 words.
5. Return ONLY the message. No explanation."#;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn build_resume_prompt(resume_text: &str, jd_text: &str) -> String {
    render_template(
        RESUME_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("jd_text", jd_text)],
    )
}

pub fn build_cover_letter_prompt(
    resume_context: &str,
    jd_text: &str,
    company: Option<&str>,
    role: Option<&str>,
) -> String {
    render_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("resume_context", resume_context),
            ("jd_text", jd_text),
            ("company", non_blank(company).unwrap_or(COMPANY_NAME_PLACEHOLDER)),
            ("role", non_blank(role).unwrap_or(POSITION_PLACEHOLDER)),
        ],
    )
}

/// The ` at {company}` clause is dropped entirely, not placeholdered, when no
/// company is given.
pub fn build_hr_message_prompt(
    resume_context: &str,
    jd_text: &str,
    recruiter_name: Option<&str>,
    company: Option<&str>,
    role: Option<&str>,
) -> String {
    let company = non_blank(company);
    let at_company = company.map(|c| format!(" at {c}")).unwrap_or_default();

    render_template(
        HR_MESSAGE_PROMPT_TEMPLATE,
        &[
            ("resume_context", resume_context),
            ("jd_text", jd_text),
            (
                "recruiter_name",
                non_blank(recruiter_name).unwrap_or(RECRUITER_PLACEHOLDER),
            ),
            ("company", company.unwrap_or(COMPANY_PLACEHOLDER)),
            ("role", non_blank(role).unwrap_or(ROLE_PLACEHOLDER)),
            ("at_company", &at_company),
            ("brief_intro", HR_BRIEF_INTRO),
        ],
    )
}
