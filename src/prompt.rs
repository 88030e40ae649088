//! Prompt construction for the sermon plan request.
//!
//! The single prompt sent to the generation API is built here so there is
//! exactly one place to review and test the string that reaches the model.
//! `build` is pure and total: identical inputs always produce byte-identical
//! output, and no input can make it fail.

use crate::form::{OTHER_OPTION, SermonInfo};

/// Placeholder for an empty required-style selection.
const UNSELECTED: &str = "(미선택)";

/// Fallback for an empty content detail: invites the model to recommend.
const NO_DETAIL: &str = "(내용 없음 - AI가 적절히 추천해주세요)";

/// Fallback for an empty theme.
const NO_THEME: &str = "(없음)";

/// Paragraph inserted only when a PDF is attached, instructing the model to
/// align the plan with the attached document.
const ATTACHMENT_NOTE: &str = "[중요] 첨부된 PDF 파일(공과 커리큘럼, 교회 연간 계획 등)을 분석하여, 해당 내용과 흐름이 일치하도록 설교 계획을 구성해주세요.";

/// The department the plan targets: the custom text when the `기타` option
/// is selected, the selection verbatim otherwise.
pub fn effective_department(info: &SermonInfo) -> &str {
    if info.department == OTHER_OPTION {
        &info.custom_department
    } else {
        &info.department
    }
}

/// The series length, resolved through the `기타` option analogously.
pub fn effective_frequency(info: &SermonInfo) -> &str {
    if info.frequency == OTHER_OPTION {
        &info.custom_frequency
    } else {
        &info.frequency
    }
}

fn or_literal<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Build the full generation prompt from the form state.
///
/// Four numbered sections: basic info (department, frequency), direction
/// (content type, detail, theme), an attachment-alignment paragraph only
/// when `has_attachment`, and the fixed authorial instructions plus the
/// Markdown-table output contract. Surrounding whitespace is trimmed.
///
/// Note: `scriptureReference` is collected by the form but intentionally
/// not interpolated here; the scripture column is left for the model.
pub fn build(info: &SermonInfo, has_attachment: bool) -> String {
    let dept = effective_department(info);
    let freq = effective_frequency(info);

    let mut prompt = format!(
        "당신은 교회학교 교육 전문가이자 탁월한 설교 기획자입니다.\n\
         다음 정보를 바탕으로 교회학교 부서를 위한 체계적이고 은혜로운 **설교 계획서**를 작성해주세요.\n\
         \n\
         ## 1. 기본 정보\n\
         - **대상 부서**: {dept}\n\
         - **설교 기간/횟수**: {freq}\n\
         \n\
         ## 2. 설교 방향성\n\
         - **설교 유형**: {content_type}\n\
         - **중점 세부 내용**: {content_detail}\n\
         - **주제/강조점**: {theme}\n",
        dept = or_literal(dept, UNSELECTED),
        freq = or_literal(freq, UNSELECTED),
        content_type = or_literal(&info.content_type, UNSELECTED),
        content_detail = or_literal(&info.content_detail, NO_DETAIL),
        theme = or_literal(&info.theme, NO_THEME),
    );

    if has_attachment {
        prompt.push_str(&format!("\n{ATTACHMENT_NOTE}\n"));
    }

    prompt.push_str(&format!(
        "\n\
         ## 3. 작성 요청 사항\n\
         1. **대상 눈높이 고려**: {dept}의 발달 단계와 이해도를 고려하여 설교 제목과 본문을 선정해주세요.\n\
         2. **구체적 구성**: 단순한 나열이 아니라, 설교의 흐름이 이어지도록 구성해주세요.\n\
         3. **적용점 포함**: 아이들의 삶에 실제적으로 적용할 수 있는 포인트(Application)를 포함해주세요.\n\
         4. **활동 제안**: 설교 후 2부 순서나 분반 공부에서 할 수 있는 간단한 활동 아이디어를 포함해주세요.\n\
         \n\
         ## 4. 출력 형식 (Markdown Table)\n\
         반드시 아래와 같은 **표(Table)** 형식으로 작성해주세요.\n\
         \n\
         | 주차 | 날짜(월/주) | 설교 제목 | 성경 본문 | 핵심 주제 (One Message) | 2부 활동/적용 아이디어 |\n\
         |:---:|:---:|---|---|---|---|\n\
         | 1주 | 1월 1주 | ... | ... | ... | ... |\n\
         \n\
         톤앤매너: 따뜻하고 격려가 되며, 교육적인 전문성이 느껴지는 어조.",
    ));

    prompt.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;

    fn filled_info() -> SermonInfo {
        let mut info = SermonInfo::default();
        info.set(Field::Department, "초등부 (1-3학년)");
        info.set(Field::Frequency, "4주 (1개월)");
        info
    }

    #[test]
    fn build_is_pure() {
        let info = filled_info();
        assert_eq!(build(&info, false), build(&info, false));
        assert_eq!(build(&info, true), build(&info, true));
    }

    #[test]
    fn output_has_no_surrounding_whitespace() {
        let prompt = build(&SermonInfo::default(), false);
        assert_eq!(prompt, prompt.trim());
        assert!(prompt.starts_with("당신은 교회학교"));
        assert!(prompt.ends_with("어조."));
    }

    #[test]
    fn contains_all_four_sections_in_order() {
        let prompt = build(&filled_info(), false);
        let positions: Vec<usize> = [
            "## 1. 기본 정보",
            "## 2. 설교 방향성",
            "## 3. 작성 요청 사항",
            "## 4. 출력 형식 (Markdown Table)",
        ]
        .iter()
        .map(|h| prompt.find(h).unwrap_or_else(|| panic!("missing {h}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn literal_selections_appear_verbatim() {
        let prompt = build(&filled_info(), false);
        assert!(prompt.contains("- **대상 부서**: 초등부 (1-3학년)"));
        assert!(prompt.contains("- **설교 기간/횟수**: 4주 (1개월)"));
    }

    #[test]
    fn empty_fields_use_fallback_literals() {
        let prompt = build(&SermonInfo::default(), false);
        assert!(prompt.contains("- **대상 부서**: (미선택)"));
        assert!(prompt.contains("- **설교 기간/횟수**: (미선택)"));
        assert!(prompt.contains("- **설교 유형**: (미선택)"));
        assert!(prompt.contains("- **중점 세부 내용**: (내용 없음 - AI가 적절히 추천해주세요)"));
        assert!(prompt.contains("- **주제/강조점**: (없음)"));
    }

    #[test]
    fn other_option_substitutes_custom_department_and_frequency() {
        let mut info = SermonInfo::default();
        info.set(Field::Department, OTHER_OPTION);
        info.set(Field::CustomDepartment, "노년부 (70대 이상)");
        info.set(Field::Frequency, OTHER_OPTION);
        info.set(Field::CustomFrequency, "여름성경학교 3일");

        let prompt = build(&info, false);
        assert!(prompt.contains("노년부 (70대 이상)"));
        assert!(prompt.contains("여름성경학교 3일"));
        assert!(
            !prompt.contains(OTHER_OPTION),
            "sentinel label must not leak into the prompt"
        );
    }

    #[test]
    fn other_option_with_empty_custom_falls_back_to_unselected() {
        let mut info = SermonInfo::default();
        info.set(Field::Department, OTHER_OPTION);
        let prompt = build(&info, false);
        assert!(prompt.contains("- **대상 부서**: (미선택)"));
    }

    #[test]
    fn blank_line_separates_direction_from_instructions() {
        // The original template joins its literals with a trailing and a
        // leading newline, leaving a blank line before section 3 in both
        // branches. Exact bytes asserted so the junction cannot drift.
        let without = build(&SermonInfo::default(), false);
        assert!(without.contains("(없음)\n\n## 3. 작성 요청 사항"));

        let with = build(&SermonInfo::default(), true);
        assert!(with.contains("(없음)\n\n[중요]"));
        assert!(with.contains("구성해주세요.\n\n## 3. 작성 요청 사항"));
    }

    #[test]
    fn attachment_paragraph_only_when_attached() {
        let info = filled_info();
        let without = build(&info, false);
        let with = build(&info, true);

        assert!(!without.contains("[중요]"));
        assert!(with.contains(ATTACHMENT_NOTE));
    }

    #[test]
    fn minimal_selections_without_attachment() {
        let prompt = build(&filled_info(), false);
        assert!(prompt.contains("초등부 (1-3학년)"));
        assert!(prompt.contains("4주 (1개월)"));
        assert!(prompt.contains("(내용 없음 - AI가 적절히 추천해주세요)"));
        assert!(!prompt.contains("첨부된 PDF 파일"));
    }

    #[test]
    fn minimal_selections_with_attachment() {
        let prompt = build(&filled_info(), true);
        assert!(prompt.contains("첨부된 PDF 파일"));
    }

    #[test]
    fn section_three_uses_raw_effective_department() {
        // Section 3 item 1 interpolates the department without a fallback,
        // matching the original template: empty stays empty.
        let prompt = build(&SermonInfo::default(), false);
        assert!(prompt.contains("1. **대상 눈높이 고려**: 의 발달 단계와"));
    }

    #[test]
    fn output_contract_table_header_present() {
        let prompt = build(&filled_info(), false);
        assert!(prompt.contains(
            "| 주차 | 날짜(월/주) | 설교 제목 | 성경 본문 | 핵심 주제 (One Message) | 2부 활동/적용 아이디어 |"
        ));
        assert!(prompt.contains("|:---:|:---:|---|---|---|---|"));
        assert!(prompt.contains("| 1주 | 1월 1주 | ... | ... | ... | ... |"));
    }

    #[test]
    fn scripture_reference_is_not_interpolated() {
        let mut info = filled_info();
        info.set(Field::ScriptureReference, "마태복음 5-7장");
        let prompt = build(&info, false);
        assert!(!prompt.contains("마태복음 5-7장"));
    }

    #[test]
    fn theme_appears_verbatim_when_set() {
        let mut info = filled_info();
        info.set(Field::Theme, "순종");
        let prompt = build(&info, false);
        assert!(prompt.contains("- **주제/강조점**: 순종"));
    }
}
