use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analysis::fixes::{CanonicalAnalysis, Normalizer};
use crate::analysis::record::{assemble_records, Projection, Record};
use crate::builders::{json, oz, prolog, ProcedureRegister, RunHeader};
use crate::network::session::Session;
use crate::text::language::Language;
use crate::text::query;
use crate::text::tokenizer::WordStream;

/// Represents errors that can occur during morphous processing
///
/// This error type encapsulates all possible errors that can occur
/// when processing a text with the morphous library.
#[derive(Debug)]
pub struct MorphousError {
    details: String,
}

impl MorphousError {
    /// Creates a new MorphousError with the given message
    pub fn new(msg: &str) -> MorphousError {
        MorphousError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for MorphousError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl std::error::Error for MorphousError {}

impl From<crate::analysis::error::AnalysisError> for MorphousError {
    fn from(error: crate::analysis::error::AnalysisError) -> Self {
        MorphousError::new(&error.to_string())
    }
}

impl From<std::io::Error> for MorphousError {
    fn from(error: std::io::Error) -> Self {
        MorphousError::new(&error.to_string())
    }
}

/// 记录回显模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EchoMode {
    /// 不回显
    #[default]
    Off,
    /// `特征:值` 对
    Basic,
    /// Prolog 子句
    Prolog,
    /// JSON 对象
    Json,
    /// Oz 记录行
    Oz,
}

/// 一次运行的全部选项
#[derive(Debug, Clone)]
pub struct MorphousOptions {
    pub language: Language,
    /// 文本的作用域标签
    pub label: String,
    /// 起始词序号：跳过它之前的词（断点续跑）
    pub start: usize,
    pub echo: EchoMode,
    pub projection: Projection,
    /// 输出文件路径；以 `+` 开头表示追加
    pub prolog_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub oz_path: Option<PathBuf>,
    /// 无分析词日志路径
    pub log_path: Option<PathBuf>,
    /// 附加缩写
    pub abbreviations: Vec<String>,
}

impl MorphousOptions {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            label: "no label".to_string(),
            start: 0,
            echo: EchoMode::default(),
            projection: Projection::default(),
            prolog_path: None,
            json_path: None,
            oz_path: None,
            log_path: None,
            abbreviations: Vec::new(),
        }
    }
}

/// 一次运行的结果汇总
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// 文本总词数（含起始序号之前被跳过的）
    pub words_seen: usize,
    pub clauses: usize,
    pub sentences: usize,
    pub analyses_returned: usize,
    pub analyses_retained: usize,
    /// 没有产出任何记录的词数（零返回或全部被过滤）
    pub silent_words: usize,
    /// 因边界错误停止时的词序号与原因；用 `--start` 从这里续跑
    pub stopped: Option<(usize, String)>,
}

/// 一组输出文件流。路径带 `+` 前缀时以追加方式打开，头部
/// 注释不再重复文件名。
struct OutputFiles {
    prolog: Option<(File, bool)>,
    json: Option<(File, bool)>,
    oz: Option<(File, bool)>,
    log: Option<File>,
    register: ProcedureRegister,
}

fn open_output(path: &Path) -> Result<(File, bool), MorphousError> {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix('+') {
        let file = OpenOptions::new().create(true).append(true).open(rest)?;
        Ok((file, false))
    } else {
        Ok((File::create(path)?, true))
    }
}

fn display_name(path: &Path) -> String {
    let text = path.to_string_lossy();
    text.strip_prefix('+').unwrap_or(&text).to_string()
}

impl OutputFiles {
    fn open(options: &MorphousOptions) -> Result<Self, MorphousError> {
        let open = |path: &Option<PathBuf>| -> Result<Option<(File, bool)>, MorphousError> {
            path.as_deref().map(open_output).transpose()
        };
        let log = match &options.log_path {
            Some(path) => Some(open_output(path)?.0),
            None => None,
        };
        Ok(Self {
            prolog: open(&options.prolog_path)?,
            json: open(&options.json_path)?,
            oz: open(&options.oz_path)?,
            log,
            register: ProcedureRegister::new(),
        })
    }

    fn write_headers(&mut self, info: &RunHeader, options: &MorphousOptions) -> Result<(), MorphousError> {
        if let Some((file, fresh)) = self.prolog.as_mut() {
            let name = options.prolog_path.as_deref().map(display_name);
            let name = if *fresh { name } else { None };
            file.write_all(prolog::header(info, name.as_deref()).as_bytes())?;
        }
        if let Some((file, fresh)) = self.json.as_mut() {
            let name = options.json_path.as_deref().map(display_name);
            let name = if *fresh { name } else { None };
            file.write_all(json::header(info, name.as_deref()).as_bytes())?;
        }
        if let Some((file, fresh)) = self.oz.as_mut() {
            let name = options.oz_path.as_deref().map(display_name);
            let name = if *fresh { name } else { None };
            file.write_all(oz::header(info, name.as_deref()).as_bytes())?;
        }
        Ok(())
    }

    fn write_record(&mut self, record: &Record) -> Result<(), MorphousError> {
        if self.prolog.is_some() {
            self.register.observe(record);
        }
        if let Some((file, _)) = self.prolog.as_mut() {
            writeln!(file, "{}", prolog::clause(record))?;
        }
        if let Some((file, _)) = self.json.as_mut() {
            writeln!(file, "{}", json::line(record))?;
        }
        if let Some((file, _)) = self.oz.as_mut() {
            writeln!(file, "{}", oz::line(record))?;
        }
        Ok(())
    }

    fn log_line(&mut self, message: &str) -> Result<(), MorphousError> {
        if let Some(file) = self.log.as_mut() {
            writeln!(file, "{message}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), MorphousError> {
        if let Some((file, _)) = self.prolog.as_mut() {
            file.write_all(prolog::footer(&self.register).as_bytes())?;
        }
        self.log_line("OPERATIONS ENDED.")?;
        Ok(())
    }
}

/// 逐词同步驱动循环：分词 → 查询 → 抓取（缓存优先）→ 归一化
/// → 装配 → 回显/写文件。一个词完整处理完才开始下一个。
///
/// 边界错误（远端暂时性失败、响应损坏）停止运行并把失败词的
/// 序号写进报告，由操作者用起始序号续跑；零结果和参考表缺项
/// 在流水线内就地吸收。
pub struct AnalysisRun<'a> {
    session: &'a mut Session,
    normalizer: &'a mut Normalizer,
    options: &'a MorphousOptions,
}

impl<'a> AnalysisRun<'a> {
    pub fn new(
        session: &'a mut Session,
        normalizer: &'a mut Normalizer,
        options: &'a MorphousOptions,
    ) -> Self {
        Self {
            session,
            normalizer,
            options,
        }
    }

    /// 处理一段文本。`input_name` 只用于输出文件头和日志。
    pub fn process(&mut self, input_name: &str, text: &str) -> Result<RunReport, MorphousError> {
        let mut outputs = OutputFiles::open(self.options)?;
        let info = RunHeader::new(
            input_name,
            self.options.label.clone(),
            self.options.start,
            self.options.projection.core(),
            self.options.projection.word(),
        );
        outputs.write_headers(&info, self.options)?;
        outputs.log_line(&format!(
            "run started: input '{}' language {} starting at word {}",
            input_name, self.options.language, self.options.start
        ))?;

        let mut report = RunReport::default();
        let mut stream = WordStream::with_abbreviations(
            text,
            self.options.language,
            self.options.label.clone(),
            self.options.abbreviations.clone(),
        );

        while let Some(word) = stream.next() {
            if word.location.word < self.options.start {
                tracing::debug!(%word, "skipping word below start ordinal");
                continue;
            }
            tracing::info!(%word, "processing");

            let submitted = query::for_word(&word);
            let candidates = match self.session.analyses_for(&word) {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::error!(%word, error = %e, "run stopped on boundary error");
                    outputs.log_line(&format!("{word} run stopped on error: {e}"))?;
                    report.stopped = Some((word.location.word, e.to_string()));
                    break;
                }
            };

            let returned = candidates.len();
            report.analyses_returned += returned;
            if returned == 0 {
                tracing::warn!(%word, "no analyses returned");
                report.silent_words += 1;
                outputs.log_line(&format!("{word} no analyses returned"))?;
                continue;
            }

            let canonical = self.normalizer.canonicalize(&word, &submitted, candidates);
            if canonical.is_empty() {
                tracing::warn!(%word, returned, "no analyses retained");
                report.silent_words += 1;
                outputs.log_line(&format!("{word} no analyses retained"))?;
                continue;
            }
            report.analyses_retained += canonical.len();

            let records = assemble_records(&word, &canonical, &self.options.projection);
            for (record, analysis) in records.iter().zip(canonical.iter()) {
                self.echo(record, analysis);
                outputs.write_record(record)?;
            }
        }

        let totals = stream.location();
        report.words_seen = totals.word;
        report.clauses = totals.clause;
        report.sentences = totals.sentence;

        outputs.finish()?;
        Ok(report)
    }

    fn echo(&self, record: &Record, analysis: &CanonicalAnalysis) {
        match self.options.echo {
            EchoMode::Off => {}
            EchoMode::Basic => println!("{}", analysis.summary()),
            EchoMode::Prolog => println!("{}", prolog::clause(record)),
            EchoMode::Json => println!("{}", json::line(record)),
            EchoMode::Oz => println!("{}", oz::line(record)),
        }
    }
}
