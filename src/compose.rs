//! Turns the letter content into the block plan.
//!
//! Composition is a pure function of the content, the options and the timestamp. It never
//! touches fonts or files, so the order and completeness of the document can be checked without
//! rendering anything.

use log::debug;

use crate::content::{LanguageVariant, LegalArgument, Letter};
use crate::model::{Block, FactRow, Illustration, Part, RichParagraph};
use crate::options::RenderOptions;
use crate::richtext::Span;
use crate::timestamp::Timestamp;

const PARAGRAPH_GAP: f64 = 0.5;
const PART_GAP: f64 = 1.5;

/// Builds the ordered block plan of the document.
///
/// The plan starts with the preamble (timestamp and opening illustration), followed by the
/// primary variant, the secondary variant when enabled and configured, and finally the legal
/// argument appendix when enabled and configured.
pub fn compose(letter: &Letter, options: &RenderOptions, timestamp: &Timestamp) -> Vec<Block> {
    let mut blocks = Vec::new();

    push_preamble(&mut blocks, &letter.primary, options, timestamp);

    push_variant(&mut blocks, &letter.primary, options, true);
    if options.include_translation() {
        if let Some(secondary) = &letter.secondary {
            blocks.push(Block::Space(PART_GAP));
            push_variant(&mut blocks, secondary, options, false);
        }
    }

    if options.include_appendix() {
        if let Some(legal) = &letter.legal_argument {
            blocks.push(Block::Space(PART_GAP));
            push_appendix(&mut blocks, legal);
        }
    }

    debug!("Composed {} blocks", blocks.len());
    blocks
}

fn push_preamble(
    blocks: &mut Vec<Block>,
    primary: &LanguageVariant,
    options: &RenderOptions,
    timestamp: &Timestamp,
) {
    let labels = &primary.labels;
    blocks.push(Block::PartStart(Part::Preamble));
    blocks.push(Block::Timestamp(timestamp.utc_line(&labels.utc_caption)));
    blocks.push(Block::Timestamp(
        timestamp.local_line(&labels.local_caption, &labels.zone_caption),
    ));
    blocks.push(Block::Space(PARAGRAPH_GAP));

    if options.include_illustrations() {
        blocks.push(Block::Illustration(Illustration::EngineerPanda));
        blocks.push(Block::Space(PARAGRAPH_GAP));
    }
}

fn push_variant(
    blocks: &mut Vec<Block>,
    variant: &LanguageVariant,
    options: &RenderOptions,
    primary: bool,
) {
    let labels = &variant.labels;
    let content = &variant.content;

    let outline_title = labels
        .variant_title
        .clone()
        .unwrap_or_else(|| content.subject.clone());
    blocks.push(Block::PartStart(Part::Variant {
        language: variant.language.clone(),
        title: outline_title,
    }));

    if let Some(title) = &labels.variant_title {
        blocks.push(Block::Title(title.clone()));
    }

    blocks.push(Block::paragraph(content.recipient.clone()));
    blocks.push(Block::Space(PARAGRAPH_GAP));
    blocks.push(Block::Paragraph(RichParagraph::new(vec![
        Span::new(format!("{}: ", labels.subject_prefix)).bold(),
        Span::new(content.subject.clone()),
    ])));
    blocks.push(Block::Space(PARAGRAPH_GAP));

    blocks.push(Block::Heading(labels.table_heading.clone()));
    blocks.push(Block::FactTable(
        variant
            .passport
            .entries()
            .iter()
            .map(|entry| FactRow {
                label: entry.label.clone(),
                value: entry.value.clone(),
            })
            .collect(),
    ));
    blocks.push(Block::Space(PARAGRAPH_GAP));

    let sections = [
        (&labels.background, &content.background, false),
        (&labels.justification, &content.justification, false),
        (&labels.request, &content.request, false),
        (&labels.repayment_plan, &content.repayment_plan, true),
    ];
    for (heading, body, is_plan) in sections {
        blocks.push(Block::Heading(heading.clone()));
        if is_plan && primary && options.include_illustrations() {
            blocks.push(Block::Illustration(Illustration::BambooPanda));
        }
        blocks.push(Block::paragraph(body.clone()));
        blocks.push(Block::Space(PARAGRAPH_GAP));
    }

    blocks.push(Block::paragraph(content.signature.clone()));
}

fn push_appendix(blocks: &mut Vec<Block>, legal: &LegalArgument) {
    blocks.push(Block::PartStart(Part::Appendix {
        title: legal.heading.clone(),
    }));
    blocks.push(Block::Title(legal.heading.clone()));

    if let Some(preliminary) = &legal.preliminary {
        blocks.push(Block::Paragraph(RichParagraph::new(vec![
            Span::new(preliminary.clone()).italic()
        ])));
        blocks.push(Block::Space(PARAGRAPH_GAP));
    }

    for section in &legal.sections {
        blocks.push(Block::Heading(section.title.clone()));
        blocks.push(Block::paragraph(section.body.clone()));
        blocks.push(Block::Space(PARAGRAPH_GAP));
    }
}
