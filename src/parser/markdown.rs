use crate::parser::{Span, SpanKind};
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use std::ops::Range;

/// Split markdown into prose and fenced code blocks.
///
/// Inline code and indented blocks stay prose; only fences are protected.
pub fn partition(content: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for fence in fenced_blocks(content) {
        // Fences nested in containers can be reported after an outer one
        if fence.start < cursor {
            continue;
        }
        push(&mut spans, content, cursor..fence.start, SpanKind::Prose);
        push(&mut spans, content, fence.clone(), SpanKind::Fence);
        cursor = fence.end;
    }
    push(&mut spans, content, cursor..content.len(), SpanKind::Prose);

    spans
}

fn fenced_blocks(content: &str) -> Vec<Range<usize>> {
    let mut blocks: Vec<Range<usize>> = Parser::new(content)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => Some(range),
            _ => None,
        })
        .collect();
    blocks.sort_by_key(|r| r.start);
    blocks
}

fn push(spans: &mut Vec<Span>, content: &str, range: Range<usize>, kind: SpanKind) {
    if range.is_empty() {
        return;
    }
    spans.push(Span {
        start: range.start,
        end: range.end,
        kind,
        content: content[range].to_string(),
        prefix_len: 0,
        suffix_len: 0,
    });
}
