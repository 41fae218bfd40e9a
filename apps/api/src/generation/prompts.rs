//! Prompt template sets for the generation pipeline.
//!
//! Two parallel sets exist — Korean (the primary product surface) and
//! English — each bundling the four stage templates, the target model,
//! and every user-facing progress string. The orchestrator picks a set
//! once per run and never branches on language after that.
//!
//! Builders are pure: identical inputs produce byte-identical prompts.

use serde::{Deserialize, Serialize};

/// Requested output language. Selects the prompt set and the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Korean,
    English,
}

impl Language {
    /// Lenient parse for form input. Anything unrecognized falls back to
    /// Korean, the product's primary language.
    pub fn from_form_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "eng" | "english" => Language::English,
            _ => Language::Korean,
        }
    }

    pub fn prompt_set(self) -> &'static PromptSet {
        match self {
            Language::Korean => &KOREAN,
            Language::English => &ENGLISH,
        }
    }
}

/// Everything language-specific about a pipeline run: the four stage
/// templates, the model to send them to, and the progress-log strings.
pub struct PromptSet {
    /// Together model identifier for this language.
    pub model: &'static str,
    pub scenario_template: &'static str,
    pub personas_template: &'static str,
    pub questions_template: &'static str,
    pub condense_template: &'static str,
    /// One line per completed stage, appended to the progress log.
    pub stage_done: [&'static str; 4],
    /// Failure line. Placeholders: `{stage}`, `{detail}`.
    pub stage_failed_template: &'static str,
    /// Emitted as the sole snapshot when required inputs are missing.
    pub missing_input: &'static str,
    /// Prefix for the sole snapshot when the PDF could not be read.
    pub extraction_failed_prefix: &'static str,
    /// Header prepended to the final result snapshot.
    pub completion_banner: &'static str,
    /// Substituted body note when condensation fails (stage 4 is non-fatal).
    pub fallback_note: &'static str,
    pub profile_heading: &'static str,
    pub questions_heading: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Korean set (primary)
// ────────────────────────────────────────────────────────────────────────────

static KOREAN: PromptSet = PromptSet {
    model: "lgai/exaone-deep-32b",

    scenario_template: r#"{company}의 {role} 채용에 대한 [면접 상황]을 아래 양식에 맞게 사실에 기반하여 구체적으로 작성해 주세요.

[면접 상황]
- 회사명: {company}
- 회사 소개: (회사의 비전, 문화, 주력 사업을 간략히 서술)
- 채용 직무: {role}
- 핵심 요구 역량: (해당 직무에 필요한 기술 스택과 소프트 스킬을 3-4가지 서술)"#,

    personas_template: r#"{company}의 {role} 직무 면접관 {interviewer_count}명의 페르소나를 생성해 주세요. 각 페르소나는 직책, 경력, 성격, 주요 질문 스타일이 드러나도록 구체적으로 묘사해야 합니다.

[페르소나 작성 예시]
1. 김성훈 CTO (40대 중반): 스타트업 초기 멤버 출신 기술 총괄. 설계 결정의 근거와 문제 해결 과정을 끝까지 파고드는 스타일.
2. 이수민 팀장 (30대 중반): 실무 팀 리더. 협업 방식과 커뮤니케이션, 컬처핏을 중시하며 경험 기반의 질문을 주로 던짐.

'thought'는 결과에 포함하지 마세요."#,

    questions_template: r#"당신은 지금부터 면접 질문 생성 AI입니다. 아래 주어진 [면접 정보]를 완벽하게 숙지하고, 최고의 면접 질문을 만들어야 합니다.

[면접 정보]
1. 면접 상황
{scenario}

2. 면접관 구성
{personas}

3. 지원자 정보 (자기소개서/포트폴리오 원문)
{resume}

[수행 과제]
위 [면접 정보]에 기반하여, 각 면접관의 역할과 스타일에 맞는 맞춤형 면접 질문을 면접관별로 {questions_per_interviewer}개씩 생성해 주세요.
- 지원자 정보의 활동과 관련된 질문을 반드시 1개 이상 포함해야 합니다.
- 각 질문 뒤에는 "(의도: ...)" 형식으로 질문의 핵심 의도를 간략히 덧붙여 주세요.
- 최종 결과물은 면접관별로 구분하여 깔끔하게 정리된 형태로만 출력해 주세요.
- 'thought'는 결과에 포함하지 마세요."#,

    condense_template: r####"아래는 지금까지 생성된 면접관 페르소나와 면접 질문입니다.

[면접관 페르소나]
{personas}

[면접 질문]
{questions}

위 내용을 정리해 주세요.
- 중복되는 내용은 제거하고, 면접관 페르소나와 면접 질문만 남겨 주세요.
- "### 🧑‍💻 면접관 프로필" 제목 아래 페르소나를, "### 📝 생성된 면접 질문" 제목 아래 질문을 배치해 주세요.
- 모든 결과는 한국어로 작성해 주세요.
- 설명이나 부연 없이 정리된 결과만 출력해 주세요."####,

    stage_done: [
        "✅ 1단계 완료: 회사 및 직무 정보 분석",
        "✅ 2단계 완료: 가상 면접관 생성",
        "✅ 3단계 완료: 면접 질문 생성",
        "✅ 4단계 완료: 결과 정리",
    ],
    stage_failed_template: "❌ {stage}단계 실패: {detail}",
    missing_input: "회사명, 직무명, 자기소개서 텍스트를 모두 입력해주세요.",
    extraction_failed_prefix: "PDF 처리 실패: ",
    completion_banner: "✅ 모든 질문 생성이 완료되었습니다!\n\n---\n",
    fallback_note: "(요약에 실패하여 원본 결과를 그대로 표시합니다)",
    profile_heading: "### 🧑‍💻 면접관 프로필",
    questions_heading: "### 📝 생성된 면접 질문",
};

// ────────────────────────────────────────────────────────────────────────────
// English set (secondary)
// ────────────────────────────────────────────────────────────────────────────

static ENGLISH: PromptSet = PromptSet {
    model: "meta-llama/Llama-3.3-70B-Instruct-Turbo",

    scenario_template: r#"Write a factual, specific [Interview Scenario] for the {role} opening at {company}, following the format below.

[Interview Scenario]
- Company: {company}
- Company profile: (briefly describe the company's vision, culture, and main business)
- Open role: {role}
- Key required competencies: (list 3-4 technical and soft skills this role demands)"#,

    personas_template: r#"Create {interviewer_count} interviewer personas for the {role} position at {company}. Describe each persona concretely: job title, years of experience, personality, and questioning style.

[Persona example]
1. Sarah Kim, CTO (late 40s): founding engineer turned head of technology. Relentlessly probes design decisions and how problems were actually solved.
2. Daniel Park, Team Lead (mid 30s): leads the hands-on team. Cares about collaboration, communication, and culture fit; asks experience-based questions.

Do not include any 'thought' content in the result."#,

    questions_template: r#"You are now an interview question generation AI. Study the [Interview Briefing] below carefully and produce the best possible interview questions.

[Interview Briefing]
1. Interview scenario
{scenario}

2. Interview panel
{personas}

3. Candidate information (résumé/portfolio, verbatim)
{resume}

[Task]
Based on the [Interview Briefing] above, generate {questions_per_interviewer} tailored questions per interviewer, matched to each interviewer's role and style.
- At least one question must reference a concrete activity from the candidate information.
- After each question, add a brief "(intent: ...)" note explaining what the question probes.
- Output only the cleanly organized questions, grouped by interviewer.
- Do not include any 'thought' content in the result."#,

    condense_template: r####"Below are the interviewer personas and interview questions generated so far.

[Interviewer personas]
{personas}

[Interview questions]
{questions}

Clean this up.
- Remove duplicates and keep only the personas and the questions.
- Place the personas under a "### 🧑‍💻 Interviewer Profiles" heading and the questions under a "### 📝 Generated Interview Questions" heading.
- Write everything in English.
- Output only the organized result, with no commentary."####,

    stage_done: [
        "✅ Stage 1 complete: company and role analyzed",
        "✅ Stage 2 complete: interviewer panel created",
        "✅ Stage 3 complete: interview questions generated",
        "✅ Stage 4 complete: results condensed",
    ],
    stage_failed_template: "❌ Stage {stage} failed: {detail}",
    missing_input: "Please provide the company name, the job title, and a résumé with readable text.",
    extraction_failed_prefix: "PDF processing failed: ",
    completion_banner: "✅ All questions generated!\n\n---\n",
    fallback_note: "(summarization failed — showing the raw results instead)",
    profile_heading: "### 🧑‍💻 Interviewer Profiles",
    questions_heading: "### 📝 Generated Interview Questions",
};

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders (one per stage, all pure)
// ────────────────────────────────────────────────────────────────────────────

/// Stage 1 — interview scenario from company and role.
pub fn build_scenario_prompt(set: &PromptSet, company: &str, role: &str) -> String {
    set.scenario_template
        .replace("{company}", company)
        .replace("{role}", role)
}

/// Stage 2 — interviewer panel personas.
pub fn build_personas_prompt(
    set: &PromptSet,
    company: &str,
    role: &str,
    interviewer_count: u8,
) -> String {
    set.personas_template
        .replace("{company}", company)
        .replace("{role}", role)
        .replace("{interviewer_count}", &interviewer_count.to_string())
}

/// Stage 3 — tailored questions. Carries the stage-1 scenario, the stage-2
/// personas, and the résumé text verbatim.
pub fn build_questions_prompt(
    set: &PromptSet,
    scenario: &str,
    personas: &str,
    resume_text: &str,
    questions_per_interviewer: u8,
) -> String {
    set.questions_template
        .replace("{scenario}", scenario)
        .replace("{personas}", personas)
        .replace("{resume}", resume_text)
        .replace(
            "{questions_per_interviewer}",
            &questions_per_interviewer.to_string(),
        )
}

/// Stage 4 — condensation of personas + questions into the final result.
pub fn build_condense_prompt(set: &PromptSet, personas: &str, questions: &str) -> String {
    set.condense_template
        .replace("{personas}", personas)
        .replace("{questions}", questions)
}

/// Failure line for the progress log. `stage` is 1-based.
pub fn stage_failed_line(set: &PromptSet, stage: u8, detail: &str) -> String {
    set.stage_failed_template
        .replace("{stage}", &stage.to_string())
        .replace("{detail}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Built a caching layer for a payments platform; cut p99 latency 40%.";

    #[test]
    fn test_builders_are_deterministic() {
        let set = Language::Korean.prompt_set();
        let a = build_questions_prompt(set, "scenario", "personas", RESUME, 3);
        let b = build_questions_prompt(set, "scenario", "personas", RESUME, 3);
        assert_eq!(a, b, "identical inputs must produce byte-identical prompts");
    }

    #[test]
    fn test_scenario_prompt_contains_company_and_role() {
        for language in [Language::Korean, Language::English] {
            let prompt = build_scenario_prompt(language.prompt_set(), "Acme", "Backend Engineer");
            assert!(prompt.contains("Acme"));
            assert!(prompt.contains("Backend Engineer"));
            assert!(!prompt.contains("{company}"));
            assert!(!prompt.contains("{role}"));
        }
    }

    #[test]
    fn test_personas_prompt_contains_count() {
        let prompt = build_personas_prompt(Language::English.prompt_set(), "Acme", "SRE", 4);
        assert!(prompt.contains('4'));
        assert!(!prompt.contains("{interviewer_count}"));
    }

    #[test]
    fn test_questions_prompt_carries_all_upstream_values_verbatim() {
        let scenario = "Scenario: fast-growing fintech hiring backend engineers.";
        let personas = "1. CTO persona\n2. Team lead persona";
        for language in [Language::Korean, Language::English] {
            let prompt =
                build_questions_prompt(language.prompt_set(), scenario, personas, RESUME, 3);
            assert!(prompt.contains(scenario));
            assert!(prompt.contains(personas));
            assert!(prompt.contains(RESUME), "résumé text must be included verbatim");
            assert!(prompt.contains('3'));
        }
    }

    #[test]
    fn test_questions_prompt_instructs_resume_grounding() {
        // Best-effort contract: the instruction must be present in the
        // prompt; whether the model obeys is not checked anywhere.
        let korean =
            build_questions_prompt(Language::Korean.prompt_set(), "s", "p", RESUME, 2);
        assert!(korean.contains("반드시 1개 이상"));

        let english =
            build_questions_prompt(Language::English.prompt_set(), "s", "p", RESUME, 2);
        assert!(english.contains("At least one question"));
    }

    #[test]
    fn test_questions_prompt_requests_intent_annotations() {
        let korean = build_questions_prompt(Language::Korean.prompt_set(), "s", "p", RESUME, 2);
        assert!(korean.contains("(의도: ...)"));

        let english = build_questions_prompt(Language::English.prompt_set(), "s", "p", RESUME, 2);
        assert!(english.contains("(intent: ...)"));
    }

    #[test]
    fn test_condense_prompt_carries_both_inputs() {
        let prompt = build_condense_prompt(
            Language::English.prompt_set(),
            "persona block",
            "question block",
        );
        assert!(prompt.contains("persona block"));
        assert!(prompt.contains("question block"));
    }

    #[test]
    fn test_language_sets_differ_in_model_and_templates() {
        let korean = Language::Korean.prompt_set();
        let english = Language::English.prompt_set();
        assert_ne!(korean.model, english.model);
        assert_ne!(korean.scenario_template, english.scenario_template);
    }

    #[test]
    fn test_language_from_form_value() {
        assert_eq!(Language::from_form_value("en"), Language::English);
        assert_eq!(Language::from_form_value("English"), Language::English);
        assert_eq!(Language::from_form_value("ko"), Language::Korean);
        assert_eq!(Language::from_form_value(""), Language::Korean);
        assert_eq!(Language::from_form_value("???"), Language::Korean);
    }

    #[test]
    fn test_stage_failed_line_interpolates() {
        let line = stage_failed_line(Language::English.prompt_set(), 2, "timeout");
        assert_eq!(line, "❌ Stage 2 failed: timeout");
    }
}
