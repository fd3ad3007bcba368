//! Oz 记录输出
//!
//! 扁平分隔格式：`analysis|特征名冒号串|值冒号串`，文本值加
//! 单引号，序号值不加，供下游转换成 Oz 语言的 record。
//! 例如 `analysis|lemma:pos|'amo':'verb'`。

use crate::analysis::record::{FieldValue, Record};
use crate::builders::RunHeader;

fn atom(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => format!("'{s}'"),
        FieldValue::Ordinal(n) => n.to_string(),
    }
}

/// 一条记录的 Oz 记录行
pub fn line(record: &Record) -> String {
    let names: Vec<&str> = record.fields().iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<String> = record.fields().iter().map(|(_, value)| atom(value)).collect();
    format!("analysis|{}|{}", names.join(":"), values.join(":"))
}

/// 文件头注释块
pub fn header(info: &RunHeader, file_name: Option<&str>) -> String {
    info.comment_block("%%", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixes::Normalizer;
    use crate::analysis::parser::RawAnalysis;
    use crate::analysis::record::{assemble_records, Projection};
    use crate::analysis::reference::PersonTable;
    use crate::text::language::Language;
    use crate::text::tokenizer::{Location, Word};

    #[test]
    fn line_joins_names_and_quoted_values() {
        let word = Word {
            text: "amare".to_string(),
            language: Language::Latin,
            label: "s".to_string(),
            location: Location {
                word: 2,
                clause: 0,
                sentence: 0,
            },
        };
        let mut normalizer = Normalizer::new(PersonTable::builtin());
        let analyses = normalizer.canonicalize(
            &word,
            "amare",
            vec![RawAnalysis::from_pairs([
                ("form", "amare"),
                ("lemma", "amo"),
                ("pos", "verb"),
            ])],
        );
        let projection = Projection::new(["lemma", "pos"], ["w"]).unwrap();
        let records = assemble_records(&word, &analyses, &projection);
        assert_eq!(line(&records[0]), "analysis|lemma:pos:w|'amo':'verb':2");
    }
}
