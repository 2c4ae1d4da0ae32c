use cloze_unwrap::{
    ClozeEditor, MemoryHost, Node,
    convert::{document_to_node, node_to_document},
    editor::unwrap_all,
    flatten, locate,
    render::render_preview,
    scan,
    theme::Theme,
};
use std::time::{Duration, Instant};
use tdoc::{Document, InlineStyle, Paragraph, Span};

/// Timing checks for cloze operations
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Scanning and locating clozes in flat text
/// - Unwrapping every cloze of a document
/// - Selection-wide removal through a host
/// - Preview rendering and tdoc conversion
const SMALL_DOC_PARAGRAPHS: usize = 10;
const MEDIUM_DOC_PARAGRAPHS: usize = 100;
const LARGE_DOC_PARAGRAPHS: usize = 500;

const ITERATIONS: usize = 50;

/// Create a document whose paragraphs carry plain, nested and styled clozes
fn create_cloze_document(num_paragraphs: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..num_paragraphs {
        let content = if i % 3 == 0 {
            vec![
                Span::new_text(&format!("Paragraph {i} asks {{{{c{}::", i + 1)),
                Span::new_styled(InlineStyle::Bold).with_text("a bold answer"),
                Span::new_text("::a hint}} and moves on."),
            ]
        } else if i % 3 == 1 {
            vec![Span::new_text(&format!(
                "{{{{c1::outer {{{{c2::inner {i}}}}} tail}}}} then plain words follow."
            ))]
        } else {
            vec![Span::new_text(&format!(
                "No clozes in paragraph {i}, just text that pads the document out."
            ))]
        };
        doc.add_paragraph(Paragraph::new_text().with_content(content));
    }
    doc
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);

        if self.avg_duration.as_millis() > 100 {
            println!("\n⚠️  WARNING: Average duration > 100ms (user-perceptible lag)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..3 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations.max(1) as u32;
    let min_duration = durations.iter().min().copied().unwrap_or_default();
    let max_duration = durations.iter().max().copied().unwrap_or_default();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

fn sized_documents() -> Vec<(&'static str, Node)> {
    vec![
        (
            "Small (10 paras)",
            document_to_node(&create_cloze_document(SMALL_DOC_PARAGRAPHS)),
        ),
        (
            "Medium (100 paras)",
            document_to_node(&create_cloze_document(MEDIUM_DOC_PARAGRAPHS)),
        ),
        (
            "Large (500 paras)",
            document_to_node(&create_cloze_document(LARGE_DOC_PARAGRAPHS)),
        ),
    ]
}

#[test]
fn bench_scan_and_locate() {
    for (name, root) in sized_documents() {
        let text = flatten(&root);
        let expected = scan(&text).len();
        assert!(expected > 0);

        let result = benchmark(&format!("scan - {name}"), ITERATIONS, || {
            assert_eq!(scan(&text).len(), expected);
        });
        result.print();

        let probe = text.chars().count() / 2;
        let result = benchmark(&format!("locate - {name}"), ITERATIONS, || {
            let _ = locate(&text, probe);
        });
        result.print();
    }
}

#[test]
fn bench_unwrap_all() {
    for (name, root) in sized_documents() {
        let iterations = if name.contains("Large") { 3 } else { 10 };
        let result = benchmark(&format!("unwrap_all - {name}"), iterations, || {
            let mut copy = root.clone();
            assert!(unwrap_all(&mut copy));
            assert!(scan(&flatten(&copy)).is_empty());
        });
        result.print();
    }
}

#[test]
fn bench_selection_removal() {
    for (name, root) in sized_documents() {
        let len = flatten(&root).chars().count();
        let iterations = if name.contains("Large") { 3 } else { 10 };
        let result = benchmark(&format!("remove_clozes over all - {name}"), iterations, || {
            let mut host = MemoryHost::new(root.clone());
            host.select(0, len);
            let mut editor = ClozeEditor::new(host);
            assert!(editor.remove_clozes());
            assert_eq!(editor.host().undo_depth(), 1);
        });
        result.print();
    }
}

#[test]
fn bench_caret_removal() {
    for (name, root) in sized_documents() {
        let text = flatten(&root);
        let Some(span) = scan(&text).last().copied() else {
            continue;
        };
        let result = benchmark(&format!("remove_clozes at caret - {name}"), ITERATIONS, || {
            let mut host = MemoryHost::new(root.clone());
            host.set_caret(span.content_start);
            let mut editor = ClozeEditor::new(host);
            assert!(editor.remove_clozes());
        });
        result.print();
    }
}

#[test]
fn bench_preview_and_conversion() {
    let theme = Theme::default();
    for (name, root) in sized_documents() {
        let result = benchmark(&format!("render_preview - {name}"), ITERATIONS, || {
            let preview = render_preview(&root, Some(0), &theme);
            assert!(!preview.lines.is_empty());
        });
        result.print();

        let result = benchmark(&format!("tdoc round trip - {name}"), ITERATIONS, || {
            let back = document_to_node(&node_to_document(&root));
            assert_eq!(back, root);
        });
        result.print();
    }
}
