// 集成测试公共模块
//
// 提供脚本化的远端边界替身和固定样例文档

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use morphous::analysis::error::{AnalysisError, AnalysisResult};
use morphous::network::session::AnalysisSource;
use morphous::text::language::Language;

/// 空结果文档
pub const EMPTY_DOCUMENT: &str = "<analyses></analyses>";

/// 脚本化的分析来源：按查询返回预置文档并记录每次调用。
/// 没有脚本的查询返回空结果文档。
pub struct ScriptedSource {
    documents: HashMap<String, String>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_document(mut self, query: &str, document: &str) -> Self {
        self.documents.insert(query.to_string(), document.to_string());
        self
    }

    /// 调用记录的共享句柄；把来源交给 Session 之后还能查看
    pub fn call_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.calls)
    }
}

impl AnalysisSource for ScriptedSource {
    fn fetch(&self, _language: Language, query: &str) -> AnalysisResult<String> {
        self.calls.borrow_mut().push(query.to_string());
        match self.documents.get(query) {
            Some(document) => Ok(document.clone()),
            None => Ok(EMPTY_DOCUMENT.to_string()),
        }
    }
}

/// 一直失败的来源，模拟服务过载
pub struct FailingSource;

impl AnalysisSource for FailingSource {
    fn fetch(&self, _language: Language, _query: &str) -> AnalysisResult<String> {
        Err(AnalysisError::TransientFetch {
            ordinal: 0,
            reason: "503 service overloaded".to_string(),
        })
    }
}

/// 返回损坏文档的来源
pub struct MalformedSource;

impl AnalysisSource for MalformedSource {
    fn fetch(&self, _language: Language, _query: &str) -> AnalysisResult<String> {
        Ok("<analyses><analysis><form>truncat".to_string())
    }
}

/// amare 的拉丁语样例文档：一条不定式分析
pub fn amare_document() -> &'static str {
    r#"<analyses>
  <analysis>
    <form lang="la">amare</form>
    <lemma>amo1</lemma>
    <expandedForm>amare</expandedForm>
    <pos>verb</pos>
    <tense>pres</tense>
    <mood>inf</mood>
    <voice>act</voice>
  </analysis>
</analyses>"#
}

/// est 的拉丁语样例文档
pub fn est_document() -> &'static str {
    r#"<analyses>
  <analysis>
    <form lang="la">est</form>
    <lemma>sum1</lemma>
    <pos>verb</pos>
    <person>3rd</person>
    <number>sg</number>
    <tense>pres</tense>
    <mood>ind</mood>
    <voice>act</voice>
  </analysis>
</analyses>"#
}

/// bonum 的拉丁语样例文档
pub fn bonum_document() -> &'static str {
    r#"<analyses>
  <analysis>
    <form lang="la">bonum</form>
    <lemma>bonus1</lemma>
    <pos>adj</pos>
    <case>nom</case>
    <gender>neut</gender>
    <number>sg</number>
  </analysis>
</analyses>"#
}

/// mhrusanto 的希腊语样例文档：一条对应原词的分析加一条
/// 由去符号查询引出的伪匹配
pub fn mhrusanto_document() -> &'static str {
    r#"<analyses>
  <analysis>
    <form lang="greek">μηρύσαντο</form>
    <lemma>μηρύομαι</lemma>
    <pos>verb</pos>
    <person>3rd</person>
    <number>pl</number>
    <tense>aor</tense>
    <mood>ind</mood>
    <voice>mid</voice>
  </analysis>
  <analysis>
    <form lang="greek">μήρυμα</form>
    <lemma>μήρυμα</lemma>
    <pos>noun</pos>
    <case>nom</case>
  </analysis>
</analyses>"#
}
