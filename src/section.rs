//! Section documents: the closed vocabulary of page building blocks.
//!
//! Every page is a sequence of section documents, each tagged by `_type`:
//!
//! | tag              | section                                    |
//! |------------------|--------------------------------------------|
//! | `sectionHeader`  | hero header: title, subtitle, CTA buttons  |
//! | `sectionContent` | rich-text prose, optional image            |
//! | `sectionCards`   | grid of cards (title, body, icon, link)    |
//! | `sectionFAQ`     | list of question/answer items              |
//! | `sectionForm`    | contact form definition                    |
//! | `sectionBlog`    | paginated post listing                     |
//!
//! The vocabulary is a closed enum ([`SectionKind`]) with exhaustive match
//! dispatch, so adding a section is a compile-checked change in one place.
//! An unrecognized tag is simply "not renderable", never an error.
//!
//! [`transform`] turns a raw CMS document into a typed [`Section`]. Each
//! transform tolerates unknown fields (exports carry `_id`, `_rev`, `_key`
//! metadata), defaults every optional field so `null` never reaches a
//! template, and drops invalid list entries (a card without a title, a CTA
//! without a target) rather than failing the whole section.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::richtext::Block;

/// The six named background tints sections may request.
///
/// Anything else in a `background` field is dropped during transform.
pub const TINTS: [&str; 6] = ["mint", "sky", "peach", "rose", "lilac", "sand"];

/// Discriminator for the closed section vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Header,
    Content,
    Cards,
    Faq,
    Form,
    Blog,
}

impl SectionKind {
    /// Every kind, in canonical order.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Header,
        SectionKind::Content,
        SectionKind::Cards,
        SectionKind::Faq,
        SectionKind::Form,
        SectionKind::Blog,
    ];

    /// The `_type` tag this kind matches in CMS documents.
    pub fn tag(self) -> &'static str {
        match self {
            SectionKind::Header => "sectionHeader",
            SectionKind::Content => "sectionContent",
            SectionKind::Cards => "sectionCards",
            SectionKind::Faq => "sectionFAQ",
            SectionKind::Form => "sectionForm",
            SectionKind::Blog => "sectionBlog",
        }
    }

    /// Look a tag up in the vocabulary. `None` means "not renderable".
    pub fn from_tag(tag: &str) -> Option<SectionKind> {
        SectionKind::ALL.iter().find(|k| k.tag() == tag).copied()
    }
}

/// Read the `_type` discriminator of a raw document, if it names a known
/// section kind.
pub fn detect(raw: &Value) -> Option<SectionKind> {
    raw.get("_type")
        .and_then(Value::as_str)
        .and_then(SectionKind::from_tag)
}

/// A typed, validated section ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Header(HeaderSection),
    Content(ContentSection),
    Cards(CardsSection),
    Faq(FaqSection),
    Form(FormSection),
    Blog(BlogSection),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Header(_) => SectionKind::Header,
            Section::Content(_) => SectionKind::Content,
            Section::Cards(_) => SectionKind::Cards,
            Section::Faq(_) => SectionKind::Faq,
            Section::Form(_) => SectionKind::Form,
            Section::Blog(_) => SectionKind::Blog,
        }
    }
}

/// Hero header at the top of a page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HeaderSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub ctas: Vec<Cta>,
    #[serde(default)]
    pub background: Option<String>,
}

/// A call-to-action button. Valid only with both a label and a target.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Cta {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
}

impl Cta {
    fn is_valid(&self) -> bool {
        !self.label.trim().is_empty() && !self.href.trim().is_empty()
    }
}

/// Rich-text prose with an optional illustration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Vec<Block>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub background: Option<String>,
}

/// Grid of cards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CardsSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Vec<Block>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub link: Option<Cta>,
}

/// Question/answer list. Built from its wire form by [`transform`], which
/// is where item validation happens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqSection {
    pub title: String,
    pub items: Vec<FaqItem>,
}

/// A single FAQ entry that survived validation: the question is non-empty
/// and an answer field was present (an empty answer body is fine).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqItem {
    pub key: String,
    pub question: String,
    pub answer: Vec<Block>,
}

#[derive(Deserialize)]
struct FaqWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    items: Vec<FaqItemWire>,
}

#[derive(Deserialize)]
struct FaqItemWire {
    #[serde(default)]
    key: String,
    #[serde(default)]
    question: String,
    answer: Option<Vec<Block>>,
}

/// Contact form definition. `endpoint` is the submission target; without
/// one the form renders with no `action` attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub intro: Vec<Block>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// A form input. `kind` is a free string (`text`, `email`, `tel`,
/// `textarea`); templates treat anything unrecognized as `text`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
}

/// Marks where the paginated post listing goes. A page may carry at most
/// one of these (enforced at content load).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlogSection {
    #[serde(default)]
    pub title: String,
}

/// Reference to an uploaded image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

/// Build the URL for an image, optionally constrained to a display width.
///
/// The width travels as a `w` query parameter, appended with `?` or `&`
/// depending on whether the source already carries a query string.
pub fn image_url(image: &ImageRef, width: Option<u32>) -> String {
    match width {
        Some(w) => {
            let sep = if image.src.contains('?') { '&' } else { '?' };
            format!("{}{sep}w={w}", image.src)
        }
        None => image.src.clone(),
    }
}

/// Why a raw document could not become a [`Section`].
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("expected a \"{expected}\" document, found \"{found}\"")]
    WrongType {
        expected: &'static str,
        found: String,
    },
    #[error("malformed \"{tag}\" section: {source}")]
    Decode {
        tag: &'static str,
        source: serde_json::Error,
    },
}

/// Transform a raw CMS document into a typed section.
///
/// Pure: the same document always yields the same section value. Invalid
/// list entries are filtered here so templates only ever see valid data.
pub fn transform(kind: SectionKind, raw: &Value) -> Result<Section, TransformError> {
    expect_tag(kind, raw)?;
    match kind {
        SectionKind::Header => {
            let mut s = decode::<HeaderSection>(kind, raw)?;
            s.ctas.retain(Cta::is_valid);
            s.background = normalize_tint(s.background);
            Ok(Section::Header(s))
        }
        SectionKind::Content => {
            let mut s = decode::<ContentSection>(kind, raw)?;
            s.image = s.image.filter(|img| !img.src.trim().is_empty());
            s.background = normalize_tint(s.background);
            Ok(Section::Content(s))
        }
        SectionKind::Cards => {
            let mut s = decode::<CardsSection>(kind, raw)?;
            s.cards.retain(|c| !c.title.trim().is_empty());
            for card in &mut s.cards {
                card.link = card.link.take().filter(Cta::is_valid);
            }
            s.background = normalize_tint(s.background);
            Ok(Section::Cards(s))
        }
        SectionKind::Faq => {
            let wire = decode::<FaqWire>(kind, raw)?;
            let mut items = Vec::new();
            for item in wire.items {
                if item.question.trim().is_empty() {
                    continue;
                }
                let Some(answer) = item.answer else {
                    continue;
                };
                items.push(FaqItem {
                    key: item.key,
                    question: item.question.trim().to_string(),
                    answer,
                });
            }
            Ok(Section::Faq(FaqSection {
                title: wire.title,
                items,
            }))
        }
        SectionKind::Form => {
            let mut s = decode::<FormSection>(kind, raw)?;
            s.fields
                .retain(|f| !f.name.trim().is_empty() && !f.label.trim().is_empty());
            Ok(Section::Form(s))
        }
        SectionKind::Blog => Ok(Section::Blog(decode::<BlogSection>(kind, raw)?)),
    }
}

fn expect_tag(kind: SectionKind, raw: &Value) -> Result<(), TransformError> {
    let found = raw.get("_type").and_then(Value::as_str).unwrap_or("(missing)");
    if found == kind.tag() {
        Ok(())
    } else {
        Err(TransformError::WrongType {
            expected: kind.tag(),
            found: found.to_string(),
        })
    }
}

fn decode<'de, T: Deserialize<'de>>(
    kind: SectionKind,
    raw: &'de Value,
) -> Result<T, TransformError> {
    T::deserialize(raw).map_err(|source| TransformError::Decode {
        tag: kind.tag(),
        source,
    })
}

fn normalize_tint(background: Option<String>) -> Option<String> {
    background
        .map(|t| t.trim().to_lowercase())
        .filter(|t| TINTS.contains(&t.as_str()))
}
