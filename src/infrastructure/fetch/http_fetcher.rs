//! HTTP implementation of the page-fetcher boundary
//!
//! Retrieves catalog pages over plain HTTP and extracts slot fields with
//! compiled CSS selectors. The raw HTML of the current page is kept as a
//! string; documents are parsed per extraction call and never held across
//! an await point.

use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::{CatalogCfg, HttpCfg, SelectorsCfg};
use crate::domain::fetch::{CatalogPage, FieldKind, PageFetcher};
use crate::shared::errors::{ExtractError, FetchError, NavigationError};

/// Compiled selector set for listing and product pages
struct Selectors {
    slot: Selector,
    price: Selector,
    rating: Selector,
    link: Selector,
    product_price: Selector,
}

impl Selectors {
    fn compile(cfg: &SelectorsCfg) -> Result<Self> {
        Ok(Self {
            slot: Self::one(&cfg.slot)?,
            price: Self::one(&cfg.price)?,
            rating: Self::one(&cfg.rating)?,
            link: Self::one(&cfg.link)?,
            product_price: Self::one(&cfg.product_price)?,
        })
    }

    fn one(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| anyhow::anyhow!("invalid selector {:?}: {}", selector, e))
    }
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
    search_url: String,
    selectors: std::sync::Arc<Selectors>,
}

impl HttpPageFetcher {
    pub fn new(catalog: &CatalogCfg, selectors: &SelectorsCfg, http: &HttpCfg) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(http.timeout())
            .build()?;

        Ok(Self {
            client,
            search_url: catalog.search_url.clone(),
            selectors: std::sync::Arc::new(Selectors::compile(selectors)?),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn open_catalog(&self, query: &str) -> Result<Box<dyn CatalogPage>, FetchError> {
        let url = build_search_url(&self.search_url, query, 1);
        let base = Url::parse(&url).map_err(|e| FetchError::Http(e.to_string()))?;
        let html = get_html(&self.client, &url).await?;
        debug!("Opened catalog for {:?} ({} bytes)", query, html.len());

        Ok(Box::new(HttpCatalogPage {
            client: self.client.clone(),
            selectors: self.selectors.clone(),
            search_url: self.search_url.clone(),
            query: query.to_string(),
            page_no: 1,
            base,
            html,
        }))
    }

    async fn product_price(&self, url: &str) -> Result<String, FetchError> {
        let html = get_html(&self.client, url).await?;
        Ok(extract_product_price(&html, &self.selectors)?)
    }
}

struct HttpCatalogPage {
    client: reqwest::Client,
    selectors: std::sync::Arc<Selectors>,
    search_url: String,
    query: String,
    page_no: u32,
    base: Url,
    html: String,
}

#[async_trait]
impl CatalogPage for HttpCatalogPage {
    async fn fetch_field(&mut self, slot: u32, kind: FieldKind) -> Result<String, ExtractError> {
        extract_slot_field(&self.html, &self.base, &self.selectors, slot, kind)
    }

    async fn advance_page(&mut self) -> Result<(), NavigationError> {
        let next = self.page_no + 1;
        let url = build_search_url(&self.search_url, &self.query, next);
        let html = get_html(&self.client, &url)
            .await
            .map_err(|e| NavigationError::Failed(e.to_string()))?;

        if count_slots(&html, &self.selectors) == 0 {
            return Err(NavigationError::NoMoreResults);
        }

        debug!("Advanced to page {} ({} bytes)", next, html.len());
        self.page_no = next;
        self.html = html;
        Ok(())
    }
}

async fn get_html(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::Http(e.to_string()))
}

fn build_search_url(template: &str, query: &str, page: u32) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    template
        .replace("{query}", &encoded)
        .replace("{page}", &page.to_string())
}

fn count_slots(html: &str, selectors: &Selectors) -> usize {
    Html::parse_document(html).select(&selectors.slot).count()
}

fn extract_slot_field(
    html: &str,
    base: &Url,
    selectors: &Selectors,
    slot: u32,
    kind: FieldKind,
) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    let container = document
        .select(&selectors.slot)
        .nth(slot.saturating_sub(1) as usize)
        .ok_or(ExtractError::NotFound {
            field: kind.as_str(),
            slot,
        })?;

    match kind {
        FieldKind::Price => element_text(&container, &selectors.price).ok_or(
            ExtractError::NotFound {
                field: "price",
                slot,
            },
        ),
        FieldKind::Rating => element_text(&container, &selectors.rating).ok_or(
            ExtractError::NotFound {
                field: "rating",
                slot,
            },
        ),
        FieldKind::Link => {
            let href = container
                .select(&selectors.link)
                .next()
                .and_then(|e| e.value().attr("href"))
                .ok_or(ExtractError::NotFound {
                    field: "link",
                    slot,
                })?;
            base.join(href)
                .map(|u| u.to_string())
                .map_err(|_| ExtractError::Malformed {
                    field: "link",
                    raw: href.to_string(),
                })
        }
    }
}

fn extract_product_price(html: &str, selectors: &Selectors) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.product_price)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ExtractError::NotFound {
            field: "price",
            slot: 0,
        })
}

fn element_text(container: &scraper::ElementRef<'_>, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
      <div class="catalog">
        <article class="product-card">
          <a class="product-card__link" href="/catalog/17017253/detail.aspx"></a>
          <div class="price"><ins>12\u{a0}499 \u{20bd}</ins></div>
          <span class="address-rate-mini">4,7</span>
        </article>
        <article class="product-card">
          <a class="product-card__link" href="https://shop.test/catalog/555/detail.aspx"></a>
          <span class="address-rate-mini">3,9</span>
        </article>
      </div>
    </body></html>"#;

    fn selectors() -> Selectors {
        Selectors::compile(&SelectorsCfg::default()).unwrap()
    }

    fn listing() -> String {
        LISTING
            .replace("\\u{a0}", "\u{a0}")
            .replace("\\u{20bd}", "\u{20bd}")
    }

    fn base() -> Url {
        Url::parse("https://shop.test/catalog/0/search.aspx?page=1").unwrap()
    }

    #[test]
    fn test_extract_fields_from_first_slot() {
        let html = listing();
        let price = extract_slot_field(&html, &base(), &selectors(), 1, FieldKind::Price).unwrap();
        assert_eq!(price, "12\u{a0}499 \u{20bd}");

        let rating =
            extract_slot_field(&html, &base(), &selectors(), 1, FieldKind::Rating).unwrap();
        assert_eq!(rating, "4,7");

        let link = extract_slot_field(&html, &base(), &selectors(), 1, FieldKind::Link).unwrap();
        assert_eq!(link, "https://shop.test/catalog/17017253/detail.aspx");
    }

    #[test]
    fn test_missing_price_is_not_found() {
        let html = listing();
        let err = extract_slot_field(&html, &base(), &selectors(), 2, FieldKind::Price)
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { field: "price", slot: 2 }));
    }

    #[test]
    fn test_slot_out_of_range() {
        let html = listing();
        let err =
            extract_slot_field(&html, &base(), &selectors(), 5, FieldKind::Link).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { slot: 5, .. }));
    }

    #[test]
    fn test_count_slots() {
        assert_eq!(count_slots(&listing(), &selectors()), 2);
        assert_eq!(count_slots("<html><body></body></html>", &selectors()), 0);
    }

    #[test]
    fn test_build_search_url() {
        let url = build_search_url(
            "https://shop.test/search.aspx?page={page}&search={query}",
            "электрический чайник",
            3,
        );
        assert!(url.ends_with("&search=%D1%8D%D0%BB%D0%B5%D0%BA%D1%82%D1%80%D0%B8%D1%87%D0%B5%D1%81%D0%BA%D0%B8%D0%B9+%D1%87%D0%B0%D0%B9%D0%BD%D0%B8%D0%BA"));
        assert!(url.contains("page=3"));
    }

    #[test]
    fn test_extract_product_price() {
        let html = r#"<html><body>
          <div class="price-block__final-price">8 999 P</div>
        </body></html>"#
            .replace('P', "\u{20bd}");
        let price = extract_product_price(&html, &selectors()).unwrap();
        assert_eq!(price, "8 999 \u{20bd}");
    }

    #[test]
    fn test_default_selectors_compile() {
        assert!(Selectors::compile(&SelectorsCfg::default()).is_ok());
    }
}
