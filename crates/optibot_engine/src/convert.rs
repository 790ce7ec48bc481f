use ego_tree::NodeId;
use scraper::{Html, Selector};

pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}

/// Strips `<script>`/`<style>` elements and unwraps the help center's
/// `div.article-body` container when present.
pub fn clean_article_html(html: &str) -> String {
    let mut fragment = Html::parse_fragment(html);

    if let Ok(noise) = Selector::parse("script, style") {
        let ids: Vec<NodeId> = fragment.select(&noise).map(|element| element.id()).collect();
        for id in ids {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    let wrapper = Selector::parse("div.article-body").ok();
    if let Some(body) = wrapper
        .as_ref()
        .and_then(|sel| fragment.select(sel).next())
    {
        return body.inner_html().trim().to_string();
    }
    fragment.root_element().inner_html().trim().to_string()
}
