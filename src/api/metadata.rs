use std::collections::HashMap;

use regex::{Captures, Regex};
use url::Url;

use crate::domain::{AppError, MetadataField, PageMetadata};
use crate::utils::song_name;

pub const TITLE_KEY: &str = "og:title";
pub const IMAGE_KEY: &str = "og:image";
pub const AUDIO_KEY: &str = "og:audio";

/// All `<meta>` tags of a document, each as a lowercase-keyed attribute map.
#[derive(Debug, Default)]
pub struct MetaTags {
    tags: Vec<HashMap<String, String>>,
}

impl MetaTags {
    pub fn parse(html: &str) -> Self {
        Self {
            tags: parse_meta_tags(html).unwrap_or_default(),
        }
    }

    /// Content of the first tag keyed by `property`, falling back to `name`.
    /// Blank content counts as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lookup("property", key)
            .or_else(|| self.lookup("name", key))
    }

    fn lookup(&self, attr: &str, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.get(attr).is_some_and(|v| v.eq_ignore_ascii_case(key)))
            .and_then(|tag| tag.get("content"))
            .map(|content| content.trim())
            .filter(|content| !content.is_empty())
    }
}

/// Pull the song title and both media references out of the page markup.
///
/// Media references may be relative; they are resolved against `page_url`.
pub fn extract_page_metadata(html: &str, page_url: &Url) -> Result<PageMetadata, AppError> {
    let tags = MetaTags::parse(html);

    let title = song_name(tags.get(TITLE_KEY));
    let cover_url = resolve(&tags, IMAGE_KEY, page_url)
        .ok_or(AppError::MetadataMissing(MetadataField::Cover))?;
    let audio_url = resolve(&tags, AUDIO_KEY, page_url)
        .ok_or(AppError::MetadataMissing(MetadataField::Audio))?;

    Ok(PageMetadata {
        title,
        cover_url,
        audio_url,
    })
}

fn resolve(tags: &MetaTags, key: &str, page_url: &Url) -> Option<Url> {
    tags.get(key).and_then(|raw| page_url.join(raw).ok())
}

fn parse_meta_tags(html: &str) -> Option<Vec<HashMap<String, String>>> {
    // Commented-out tags and tag-like text inside raw-text elements are not markup.
    let hidden_re = Regex::new(
        r"(?is)<!--.*?(?:-->|\z)|<script\b.*?(?:</script\s*>|\z)|<style\b.*?(?:</style\s*>|\z)|<noscript\b.*?(?:</noscript\s*>|\z)",
    )
    .ok()?;
    let html = hidden_re.replace_all(html, "");

    // Quoted values may contain '>'
    let tag_re = Regex::new(r#"(?is)<meta\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).ok()?;
    let attr_re =
        Regex::new(r#"(?s)([^\s"'<>/=]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).ok()?;

    let tags = tag_re
        .captures_iter(&html)
        .map(|tag| {
            let mut attrs = HashMap::new();
            for attr in attr_re.captures_iter(&tag[1]) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map_or("", |m| m.as_str());
                attrs
                    .entry(attr[1].to_ascii_lowercase())
                    .or_insert_with(|| decode_entities(value));
            }
            attrs
        })
        .collect();

    Some(tags)
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let Ok(entity_re) = Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);") else {
        return raw.to_string();
    };

    entity_re
        .replace_all(raw, |caps: &Captures| match decode_entity(&caps[1]) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse().ok()?
    } else {
        return match entity {
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "nbsp" => Some('\u{a0}'),
            _ => None,
        };
    };
    char::from_u32(code)
}
