use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use tdoc::{Document, markdown, parse, writer::Writer};

use cloze_unwrap::convert::{document_to_node, node_to_document};
use cloze_unwrap::render::{listing_line, print_lines, print_preview, render_preview};
use cloze_unwrap::theme::Theme;
use cloze_unwrap::{ClozeEditor, MemoryHost, Node, flatten, scan_sorted};

const USAGE: &str = "Usage: uncloze <file> [--at <offset> | --select <start>..<end> | --all] \
[--list] [--dry-run] [--no-color]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DocumentFormat {
    Ftml,
    Markdown,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("md") | Some("markdown") | Some("mkd") | Some("mdown") | Some("mdtxt") => {
                DocumentFormat::Markdown
            }
            _ => DocumentFormat::Ftml,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    List,
    At(usize),
    Select(usize, usize),
    All,
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    path: PathBuf,
    action: Action,
    list: bool,
    dry_run: bool,
    color: bool,
}

fn main() -> Result<()> {
    cloze_unwrap::init_logging();
    run()
}

fn run() -> Result<()> {
    let no_color_env = env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    let Some(mut options) = parse_args(env::args().skip(1))? else {
        eprintln!("{USAGE}");
        return Ok(());
    };
    options.color &= !no_color_env;
    let theme = if options.color {
        Theme::default()
    } else {
        Theme::plain()
    };

    let (document, format) = load_document(&options.path)?;
    let root = document_to_node(&document);
    let mut stdout = io::stdout();

    if options.list || options.action == Action::List {
        list_clozes(&mut stdout, &root, &theme, options.color)?;
    }

    let mut host = MemoryHost::new(root);
    match options.action {
        Action::List => return Ok(()),
        Action::At(offset) => host.set_caret(offset),
        Action::Select(start, end) => host.select(start, end),
        Action::All => {
            let len = host.flat_text().chars().count();
            host.select(0, len);
        }
    }

    let mut editor = ClozeEditor::new(host);
    if !editor.remove_clozes() {
        eprintln!("{}", nothing_removed_message(options.action));
        return Ok(());
    }
    let host = editor.into_host();
    let caret = host.caret_offset();
    let root = host
        .into_root()
        .context("editable region missing after the edit")?;

    if options.dry_run {
        let preview = render_preview(&root, caret, &theme);
        print_preview(&mut stdout, &preview, options.color).context("failed to print preview")?;
        return Ok(());
    }

    save_document(&options.path, format, &node_to_document(&root))?;
    eprintln!("Saved {}", options.path.display());
    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Options>> {
    let mut path = None;
    let mut action = Action::List;
    let mut list = false;
    let mut dry_run = false;
    let mut color = true;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--at" => {
                let value = args.next().context("--at needs an offset")?;
                let offset = value
                    .parse()
                    .with_context(|| format!("invalid offset {value:?}"))?;
                action = Action::At(offset);
            }
            "--select" => {
                let value = args.next().context("--select needs <start>..<end>")?;
                let (start, end) = value
                    .split_once("..")
                    .with_context(|| format!("invalid range {value:?}"))?;
                let start: usize = start
                    .parse()
                    .with_context(|| format!("invalid range start {start:?}"))?;
                let end: usize = end
                    .parse()
                    .with_context(|| format!("invalid range end {end:?}"))?;
                if end < start {
                    bail!("range end {end} lies before its start {start}");
                }
                action = Action::Select(start, end);
            }
            "--all" => action = Action::All,
            "--list" => list = true,
            "--dry-run" => dry_run = true,
            "--no-color" => color = false,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }

    let Some(path) = path else {
        return Ok(None);
    };
    Ok(Some(Options {
        path,
        action,
        list,
        dry_run,
        color,
    }))
}

fn load_document(path: &Path) -> Result<(Document, DocumentFormat)> {
    let format = DocumentFormat::from_path(path);
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed = match format {
        DocumentFormat::Ftml => parse(std::io::Cursor::new(content))
            .map_err(|err| -> Box<dyn std::error::Error + Send + Sync> { Box::new(err) }),
        DocumentFormat::Markdown => markdown::parse(std::io::Cursor::new(content)),
    };
    let document =
        parsed.map_err(|err| anyhow!("failed to parse {}: {err}", path.display()))?;
    Ok((document, format))
}

fn save_document(path: &Path, format: DocumentFormat, document: &Document) -> Result<()> {
    match format {
        DocumentFormat::Ftml => {
            let writer = Writer::new();
            let contents = writer
                .write_to_string(document)
                .context("failed to render FTML")?;
            fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        DocumentFormat::Markdown => {
            let mut contents = Vec::new();
            markdown::write(&mut contents, document).context("failed to render Markdown")?;
            fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    Ok(())
}

fn list_clozes(out: &mut impl io::Write, root: &Node, theme: &Theme, color: bool) -> Result<()> {
    let preview = render_preview(root, None, theme);
    print_preview(out, &preview, color).context("failed to print document")?;

    let text = flatten(root);
    let lines: Vec<_> = scan_sorted(&text)
        .iter()
        .map(|span| listing_line(&text, span, theme))
        .collect();
    if lines.is_empty() {
        eprintln!("No clozes found");
        return Ok(());
    }
    print_lines(out, &lines, color).context("failed to print clozes")
}

fn nothing_removed_message(action: Action) -> String {
    match action {
        Action::At(offset) => format!("No cloze at offset {offset}"),
        Action::Select(start, end) => format!("No cloze in {start}..{end}"),
        Action::All | Action::List => "No clozes found".to_string(),
    }
}
