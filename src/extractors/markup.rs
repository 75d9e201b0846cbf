use std::io::Read;
use std::sync::OnceLock;

use regex::Regex;
use zip::ZipArchive;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Replace every `<...>` tag with a space and collapse whitespace runs
pub fn strip_markup(xml: &str) -> String {
    let without_tags = tag_regex().replace_all(xml, " ");
    whitespace_regex()
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Read one member of an Office container as text; `None` if it is absent
pub fn read_zip_member<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Option<String> {
    let mut member = archive.by_name(name).ok()?;
    let mut xml = String::with_capacity(member.size() as usize);
    member.read_to_string(&mut xml).ok()?;
    Some(xml)
}
