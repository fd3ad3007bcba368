//! morphous CLI：读取文本或文本文件，逐词向形态分析服务取
//! 候选分析，归一化后按投影输出 Prolog/JSON/Oz 记录。

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use morphous::analysis::fixes::Normalizer;
use morphous::analysis::record::Projection;
use morphous::analysis::reference::PersonTable;
use morphous::config::MorphousConfig;
use morphous::core::{AnalysisRun, EchoMode, MorphousError, MorphousOptions, RunReport};
use morphous::network::cache::{read_seed_list, AnalysisCache};
use morphous::network::session::{MorpheusEndpoint, Session};
use morphous::text::language::Language;
use morphous::text::query;

#[derive(Parser)]
#[command(
    name = "morphous",
    version,
    about = "Turn Greek and Latin text into structured morphological records"
)]
struct Cli {
    /// 待分析的文本，或文本文件路径
    input: String,

    /// 语言：greek 或 la
    #[arg(value_parser = parse_language)]
    lang: Language,

    /// 要导出的核心特征，空格分隔；缺省导出全部核心特征
    #[arg(long)]
    core: Option<String>,

    /// 要导出的词属性（label w c s），空格分隔；缺省不导出
    #[arg(long)]
    word: Option<String>,

    /// Prolog 输出文件；前缀 `+` 表示追加
    #[arg(long)]
    prolog: Option<PathBuf>,

    /// JSON 输出文件；前缀 `+` 表示追加
    #[arg(long)]
    json: Option<PathBuf>,

    /// Oz 记录输出文件；前缀 `+` 表示追加
    #[arg(long)]
    oz: Option<PathBuf>,

    /// 回显格式
    #[arg(long, value_enum, default_value = "off")]
    echo: EchoMode,

    /// 本次文本的标签
    #[arg(long)]
    label: Option<String>,

    /// 无分析词日志文件
    #[arg(long)]
    log: Option<PathBuf>,

    /// 起始词序号（断点续跑用，从零开始）
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// 配置文件路径；缺省按搜索路径找 morphous.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// 只从 cachewords.<lang> 种子词表构建持久缓存，然后退出
    #[arg(long)]
    build_cache: bool,

    /// 运行结束后不保存持久缓存
    #[arg(long)]
    no_cache_save: bool,
}

fn parse_language(value: &str) -> Result<Language, String> {
    Language::parse(value).ok_or_else(|| format!("unknown language '{value}' (use greek or la)"))
}

fn main() {
    // RUST_LOG 控制日志级别，默认 info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run() -> Result<(), MorphousError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MorphousConfig::from_path(path)?,
        None => MorphousConfig::load()?,
    };
    let language = cli.lang;

    let projection = build_projection(&cli)?;

    let person_table = match &config.person_table {
        Some(path) => PersonTable::load(path)?,
        None => PersonTable::builtin(),
    };

    let cache_path = config.cache_path(language);
    let mut cache = AnalysisCache::load_or_empty(&cache_path, language);

    // 精选词表存在就并入持久层的待抓取集（键是规范化后的查询）
    let seed_path = config.seed_path(language);
    if seed_path.exists() {
        let words = read_seed_list(&seed_path)?;
        cache.seed_pending(words.iter().map(|w| query::normalize(w, language)));
    }
    tracing::info!(
        "persistent cache: {} entries, {} pending",
        cache.persistent_len(),
        cache.pending().len()
    );

    let endpoint = MorpheusEndpoint::new(&config.service_url, config.timeout())?;
    let mut session = Session::new(Box::new(endpoint), cache);

    if cli.build_cache {
        let built = session.build_persistent_cache()?;
        session.cache().save(&cache_path)?;
        println!(
            "persistent cache built: {built} entries fetched, {} total",
            session.cache().persistent_len()
        );
        return Ok(());
    }

    let text = read_input(&cli.input);

    let mut options = MorphousOptions::new(language);
    options.label = cli.label.clone().unwrap_or_else(|| "no label".to_string());
    options.start = cli.start;
    options.echo = cli.echo;
    options.projection = projection;
    options.prolog_path = cli.prolog.clone();
    options.json_path = cli.json.clone();
    options.oz_path = cli.oz.clone();
    options.log_path = cli.log.clone();
    options.abbreviations = config.abbreviations.clone();

    let mut normalizer = Normalizer::new(person_table);
    let report = AnalysisRun::new(&mut session, &mut normalizer, &options).process(&cli.input, &text)?;

    if !cli.no_cache_save {
        session.cache().save(&cache_path)?;
    }

    let cache_stats = session.cache().stats();
    tracing::info!(
        persistent_hits = cache_stats.persistent_hits,
        volatile_hits = cache_stats.volatile_hits,
        misses = cache_stats.misses,
        "cache statistics"
    );

    print_report(&report, cli.start);

    if let Some((ordinal, reason)) = &report.stopped {
        eprintln!("run stopped at word {ordinal}: {reason}");
        eprintln!("resume with --start {ordinal}");
        process::exit(2);
    }
    Ok(())
}

/// 输入参数既可以是文件路径也可以是文本本身
fn read_input(input: &str) -> String {
    match fs::read_to_string(input) {
        Ok(text) => text,
        Err(_) => input.to_string(),
    }
}

fn build_projection(cli: &Cli) -> Result<Projection, MorphousError> {
    let word: Vec<&str> = cli
        .word
        .as_deref()
        .map(|w| w.split_whitespace().collect())
        .unwrap_or_default();
    let projection = match cli.core.as_deref() {
        Some(core) => Projection::new(core.split_whitespace(), word)?,
        None => {
            Projection::new(morphous::analysis::CORE_FEATURES.iter().copied(), word)?
        }
    };
    Ok(projection)
}

fn print_report(report: &RunReport, start: usize) {
    println!("Text counts:");
    println!("{} word(s) analyzed in", report.words_seen.saturating_sub(start));
    println!("{} clauses;", report.clauses);
    println!("{} sentences.", report.sentences);
    println!(
        "{} analyses retained out of {} analyses returned.",
        report.analyses_retained, report.analyses_returned
    );
    if report.silent_words > 0 {
        println!(
            "{} words did not yield output. See run output or log.",
            report.silent_words
        );
    }
    if report.words_seen <= start {
        println!(
            "--start was set beyond the end of input ({}).",
            report.words_seen.saturating_sub(1)
        );
    }
}
