//! Pipeline orchestrator — composes prompt builder → completion client → normalizer.
//!
//! Flow for `generate_all`:
//!   resume (hard dependency) → build_resume_context →
//!   cover letter ∥ HR message (each fault-tolerant, reported as warnings)
//!
//! Validation runs before any model call. Nothing here retries.

use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::generation::context::build_resume_context;
use crate::generation::models::{
    present, CombinedResult, CoverLetterRequest, GenerateAllRequest, HrMessageRequest,
    ResumeRecord, ResumeRequest, Validate,
};
use crate::generation::normalizer::normalize_resume;
use crate::generation::prompts::{
    build_cover_letter_prompt, build_hr_message_prompt, build_resume_prompt,
};
use crate::llm_client::{CompletionClient, CompletionOptions};

pub const RESUME_MAX_TOKENS: u32 = 2500;
pub const COVER_LETTER_MAX_TOKENS: u32 = 900;
pub const HR_MESSAGE_MAX_TOKENS: u32 = 350;

pub const COVER_LETTER_WARNING: &str = "Cover letter generation failed.";
pub const HR_MESSAGE_WARNING: &str = "HR message generation failed.";

pub async fn generate_resume(
    llm: &dyn CompletionClient,
    request: &ResumeRequest,
) -> Result<ResumeRecord, GenerationError> {
    request.validate()?;
    resume_step(llm, request.resume_text.trim(), request.jd_text.trim()).await
}

pub async fn generate_cover_letter(
    llm: &dyn CompletionClient,
    request: &CoverLetterRequest,
) -> Result<String, GenerationError> {
    request.validate()?;
    cover_letter_step(
        llm,
        request.resume_context.trim(),
        request.jd_text.trim(),
        present(&request.company),
        present(&request.role),
    )
    .await
}

pub async fn generate_hr_message(
    llm: &dyn CompletionClient,
    request: &HrMessageRequest,
) -> Result<String, GenerationError> {
    request.validate()?;
    hr_message_step(
        llm,
        request.resume_context.trim(),
        request.jd_text.trim(),
        present(&request.recruiter_name),
        present(&request.company),
        present(&request.role),
    )
    .await
}

/// Resume first; its failure aborts everything. The two dependent documents run
/// concurrently and degrade to empty strings plus a warning each. Warnings are
/// always ordered cover letter, then HR message.
pub async fn generate_all(
    llm: &dyn CompletionClient,
    request: &GenerateAllRequest,
) -> Result<CombinedResult, GenerationError> {
    request.validate()?;
    let jd_text = request.jd_text.trim();
    let company = present(&request.company);
    let role = present(&request.role);

    info!("[generate-all] Step 1: resume");
    let resume = resume_step(llm, request.resume_text.trim(), jd_text).await?;
    let resume_context = build_resume_context(&resume);

    info!("[generate-all] Step 2+3: cover letter and HR message");
    let (cover_letter, hr_message) = tokio::join!(
        cover_letter_step(llm, &resume_context, jd_text, company, role),
        hr_message_step(
            llm,
            &resume_context,
            jd_text,
            present(&request.recruiter_name),
            company,
            role,
        ),
    );

    let mut warnings = Vec::new();
    let cover_letter = cover_letter.unwrap_or_else(|e| {
        warn!("[generate-all] Cover letter failed: {e}");
        warnings.push(COVER_LETTER_WARNING.to_string());
        String::new()
    });
    let hr_message = hr_message.unwrap_or_else(|e| {
        warn!("[generate-all] HR message failed: {e}");
        warnings.push(HR_MESSAGE_WARNING.to_string());
        String::new()
    });

    info!(
        "[generate-all] Pipeline complete ({} warnings)",
        warnings.len()
    );

    Ok(CombinedResult {
        resume,
        cover_letter,
        hr_message,
        warnings,
    })
}

async fn resume_step(
    llm: &dyn CompletionClient,
    resume_text: &str,
    jd_text: &str,
) -> Result<ResumeRecord, GenerationError> {
    let prompt = build_resume_prompt(resume_text, jd_text);
    let raw = llm
        .complete(&prompt, &CompletionOptions::with_max_tokens(RESUME_MAX_TOKENS))
        .await?;
    normalize_resume(&raw)
}

async fn cover_letter_step(
    llm: &dyn CompletionClient,
    resume_context: &str,
    jd_text: &str,
    company: Option<&str>,
    role: Option<&str>,
) -> Result<String, GenerationError> {
    let prompt = build_cover_letter_prompt(resume_context, jd_text, company, role);
    let letter = llm
        .complete(
            &prompt,
            &CompletionOptions::with_max_tokens(COVER_LETTER_MAX_TOKENS),
        )
        .await?;
    Ok(letter.trim().to_string())
}

async fn hr_message_step(
    llm: &dyn CompletionClient,
    resume_context: &str,
    jd_text: &str,
    recruiter_name: Option<&str>,
    company: Option<&str>,
    role: Option<&str>,
) -> Result<String, GenerationError> {
    let prompt =
        build_hr_message_prompt(resume_context, jd_text, recruiter_name, company, role);
    let message = llm
        .complete(
            &prompt,
            &CompletionOptions::with_max_tokens(HR_MESSAGE_MAX_TOKENS),
        )
        .await?;
    Ok(message.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::ScriptedClient;
    use crate::llm_client::LlmError;

    const RESUME_JSON: &str = r#"```json
{"name":"Jane Doe","contact":{"email":"jane@example.com"},"education":[],
 "skills":{"Languages":"Rust"},
 "experience":[{"title":"Engineer","company":"Acme","start":"2020","end":"Present",
   "bullets":["Accomplished A through B using C","Accomplished D through E using F","Accomplished G through H using I"]}],
 "projects":[],"ats_score":91,"matched_keywords":["Rust"]}
```"#;

    fn all_request() -> GenerateAllRequest {
        GenerateAllRequest {
            resume_text: "  Jane Doe, engineer  ".to_string(),
            jd_text: " Rust role ".to_string(),
            recruiter_name: Some("Priya".to_string()),
            company: Some("Acme".to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_generate_resume_validates_before_calling_model() {
        let llm = ScriptedClient::new(vec![]);
        let request = ResumeRequest {
            resume_text: "resume".to_string(),
            jd_text: "   ".to_string(),
        };
        let err = generate_resume(&llm, &request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation("jd_text")));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_resume_uses_trimmed_inputs_and_budget() {
        let llm = ScriptedClient::new(vec![Ok(RESUME_JSON.to_string())]);
        let request = ResumeRequest {
            resume_text: "\n Jane \n".to_string(),
            jd_text: " Rust ".to_string(),
        };
        let record = generate_resume(&llm, &request).await.unwrap();
        assert_eq!(record.ats_score, 91);

        let calls = llm.calls();
        assert_eq!(calls[0].max_tokens, RESUME_MAX_TOKENS);
        assert!(calls[0].prompt.contains("RESUME:\nJane\n"));
        assert!(calls[0].prompt.contains("JOB DESCRIPTION:\nRust\n"));
    }

    #[tokio::test]
    async fn test_generate_resume_propagates_normalizer_error() {
        let llm = ScriptedClient::new(vec![Ok("no json here".to_string())]);
        let request = ResumeRequest {
            resume_text: "r".to_string(),
            jd_text: "j".to_string(),
        };
        let err = generate_resume(&llm, &request).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn test_generate_cover_letter_trims_and_uses_budget() {
        let llm = ScriptedClient::new(vec![Ok("  Dear Hiring Manager,\n...  ".to_string())]);
        let request = CoverLetterRequest {
            resume_context: "ctx".to_string(),
            jd_text: "jd".to_string(),
            company: Some("".to_string()),
            role: Some("SRE".to_string()),
        };
        let letter = generate_cover_letter(&llm, &request).await.unwrap();
        assert_eq!(letter, "Dear Hiring Manager,\n...");
        let calls = llm.calls();
        assert_eq!(calls[0].max_tokens, COVER_LETTER_MAX_TOKENS);
        assert!(calls[0].prompt.contains("COMPANY: [Company Name]\nROLE: SRE"));
    }

    #[tokio::test]
    async fn test_generate_hr_message_propagates_client_error() {
        let llm = ScriptedClient::new(vec![Err(LlmError::EmptyResponse)]);
        let request = HrMessageRequest {
            resume_context: "ctx".to_string(),
            jd_text: "jd".to_string(),
            ..Default::default()
        };
        let err = generate_hr_message(&llm, &request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Llm(LlmError::EmptyResponse)));
        assert_eq!(llm.calls()[0].max_tokens, HR_MESSAGE_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_generate_all_happy_path_feeds_resume_context() {
        let llm = ScriptedClient::routed(
            Ok(RESUME_JSON.to_string()),
            Ok("the letter".to_string()),
            Ok("the message".to_string()),
        );
        let result = generate_all(&llm, &all_request()).await.unwrap();

        assert_eq!(result.resume.name, "Jane Doe");
        assert_eq!(result.cover_letter, "the letter");
        assert_eq!(result.hr_message, "the message");
        assert!(result.warnings.is_empty());
        assert_eq!(llm.call_count(), 3);

        let expected_context = build_resume_context(&result.resume);
        for call in llm.calls().iter().skip(1) {
            assert!(call.prompt.contains(&expected_context));
            assert!(call.prompt.contains("JOB DESCRIPTION:\nRust role\n"));
        }
        let hr = llm
            .calls()
            .into_iter()
            .find(|c| c.max_tokens == HR_MESSAGE_MAX_TOKENS)
            .unwrap();
        assert!(hr.prompt.contains("Hi Priya,"));
        assert!(hr.prompt.contains("the this role role at Acme."));
    }

    #[tokio::test]
    async fn test_generate_all_resume_failure_short_circuits() {
        let llm = ScriptedClient::routed(
            Err(LlmError::EmptyContent),
            Ok("letter".to_string()),
            Ok("message".to_string()),
        );
        let err = generate_all(&llm, &all_request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Llm(LlmError::EmptyContent)));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_all_cover_letter_failure_is_a_warning() {
        let llm = ScriptedClient::routed(
            Ok(RESUME_JSON.to_string()),
            Err(LlmError::EmptyResponse),
            Ok("message".to_string()),
        );
        let result = generate_all(&llm, &all_request()).await.unwrap();
        assert_eq!(result.cover_letter, "");
        assert_eq!(result.hr_message, "message");
        assert_eq!(result.warnings, vec![COVER_LETTER_WARNING.to_string()]);
    }

    #[tokio::test]
    async fn test_generate_all_both_dependents_fail_in_fixed_order() {
        let llm = ScriptedClient::routed(
            Ok(RESUME_JSON.to_string()),
            Err(LlmError::EmptyResponse),
            Err(LlmError::EmptyContent),
        );
        let result = generate_all(&llm, &all_request()).await.unwrap();
        assert_eq!(result.cover_letter, "");
        assert_eq!(result.hr_message, "");
        assert_eq!(
            result.warnings,
            vec![
                COVER_LETTER_WARNING.to_string(),
                HR_MESSAGE_WARNING.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_all_missing_field_makes_no_calls() {
        let llm = ScriptedClient::new(vec![]);
        let request = GenerateAllRequest {
            resume_text: String::new(),
            ..all_request()
        };
        let err = generate_all(&llm, &request).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: 'resume_text'");
        assert_eq!(llm.call_count(), 0);
    }
}
