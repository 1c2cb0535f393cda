#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::macros::datetime;
use vizesayfa::application::page::PageService;
use vizesayfa::application::repos::{
    ContentRepo, CountryCollectionsRepo, HealthProbe, RepoError,
};
use vizesayfa::application::resolver::SlugResolver;
use vizesayfa::application::site::SiteIdentity;
use vizesayfa::cache::{CacheConfig, PageCache};
use vizesayfa::domain::entities::{
    BlogRecord, CommentRecord, CountryId, CountryMenuRecord, CountryRecord, CountrySections,
    CustomPageRecord, ProductRecord, TaxonomyRecord, VisaRequirementRecord,
};
use vizesayfa::domain::faq::{FaqAnswer, FaqEntry};
use vizesayfa::infra::http::{AdminState, HttpState};

pub const PUBLIC_URL: &str = "https://vize.example";
pub const BRAND: &str = "Vize Merkezi";

/// In-memory catalogue with per-operation call counters and failure switches.
#[derive(Default)]
pub struct FakeStore {
    pub custom_pages: Vec<CustomPageRecord>,
    pub blogs: Vec<BlogRecord>,
    pub countries: Vec<CountryRecord>,
    pub menus: Vec<CountryMenuRecord>,
    pub taxonomies: Vec<TaxonomyRecord>,
    pub products: Vec<ProductRecord>,
    pub faq: HashMap<CountryId, Vec<FaqEntry>>,
    pub comments: Vec<CommentRecord>,
    /// `(source passport code, record)`
    pub requirements: Vec<(String, VisaRequirementRecord)>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeStore {
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    fn enter(&self, op: &'static str) -> Result<(), RepoError> {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
        if self.failing.lock().unwrap().contains(op) {
            Err(RepoError::Persistence(format!("{op} failed")))
        } else {
            Ok(())
        }
    }
}

fn like(value: &str, pattern: &str) -> bool {
    value.contains(pattern.trim_matches('%'))
}

#[async_trait]
impl ContentRepo for FakeStore {
    async fn find_custom_page(&self, slug: &str) -> Result<Option<CustomPageRecord>, RepoError> {
        self.enter("find_custom_page")?;
        Ok(self.custom_pages.iter().find(|p| p.slug == slug).cloned())
    }

    async fn find_blog(&self, slug: &str) -> Result<Option<BlogRecord>, RepoError> {
        self.enter("find_blog")?;
        Ok(self.blogs.iter().find(|b| b.slug == slug).cloned())
    }

    async fn find_country_by_slug(&self, slug: &str) -> Result<Option<CountryRecord>, RepoError> {
        self.enter("find_country_by_slug")?;
        Ok(self.countries.iter().find(|c| c.slug == slug).cloned())
    }

    async fn find_country_by_id(&self, id: CountryId) -> Result<Option<CountryRecord>, RepoError> {
        self.enter("find_country_by_id")?;
        Ok(self.countries.iter().find(|c| c.id == id).cloned())
    }

    async fn find_menu(&self, slug: &str) -> Result<Option<CountryMenuRecord>, RepoError> {
        self.enter("find_menu")?;
        Ok(self.menus.iter().find(|m| m.slug == slug).cloned())
    }

    async fn find_taxonomy(
        &self,
        slug: &str,
        type_pattern: &str,
    ) -> Result<Option<TaxonomyRecord>, RepoError> {
        self.enter("find_taxonomy")?;
        Ok(self
            .taxonomies
            .iter()
            .find(|t| t.slug == slug && like(&t.type_name, type_pattern))
            .cloned())
    }
}

#[async_trait]
impl CountryCollectionsRepo for FakeStore {
    async fn list_menus(&self, country_id: CountryId) -> Result<Vec<CountryMenuRecord>, RepoError> {
        self.enter("list_menus")?;
        Ok(self
            .menus
            .iter()
            .filter(|m| m.parent_id == Some(country_id))
            .cloned()
            .collect())
    }

    async fn list_products(&self, country_id: CountryId) -> Result<Vec<ProductRecord>, RepoError> {
        self.enter("list_products")?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.country_id == country_id)
            .cloned()
            .collect())
    }

    async fn list_faq(&self, country_id: CountryId) -> Result<Vec<FaqEntry>, RepoError> {
        self.enter("list_faq")?;
        Ok(self.faq.get(&country_id).cloned().unwrap_or_default())
    }

    async fn list_blogs(
        &self,
        _country_id: CountryId,
        limit: u32,
    ) -> Result<Vec<BlogRecord>, RepoError> {
        self.enter("list_blogs")?;
        Ok(self.blogs.iter().take(limit as usize).cloned().collect())
    }

    async fn list_comments(&self, country_id: CountryId) -> Result<Vec<CommentRecord>, RepoError> {
        self.enter("list_comments")?;
        Ok(self
            .comments
            .iter()
            .filter(|c| c.country_id == country_id)
            .cloned()
            .collect())
    }

    async fn find_visa_requirement(
        &self,
        source_code: &str,
        destination_code: &str,
    ) -> Result<Option<VisaRequirementRecord>, RepoError> {
        self.enter("find_visa_requirement")?;
        Ok(self
            .requirements
            .iter()
            .find(|(source, record)| source == source_code && record.country_code == destination_code)
            .map(|(_, record)| record.clone()))
    }
}

#[async_trait]
impl HealthProbe for FakeStore {
    async fn check(&self) -> Result<(), RepoError> {
        self.enter("health")
    }
}

pub fn country(id: CountryId, slug: &str, name: &str) -> CountryRecord {
    CountryRecord {
        id,
        slug: slug.to_string(),
        country_code: None,
        name: name.to_string(),
        name_en: None,
        title: format!("{name} Vizesi"),
        title_en: None,
        description: None,
        description_en: None,
        contents: None,
        contents_en: None,
        meta_title: None,
        meta_title_en: None,
        meta_description: None,
        meta_description_en: None,
        sections: CountrySections::default(),
        process_time: None,
        image_url: None,
    }
}

pub fn custom_page(id: i64, slug: &str, title: &str) -> CustomPageRecord {
    CustomPageRecord {
        id,
        slug: slug.to_string(),
        published: true,
        title: title.to_string(),
        title_en: None,
        content: "<p>Kurumsal bilgiler.</p>".to_string(),
        content_en: None,
        meta_title: None,
        meta_title_en: None,
        meta_description: None,
        meta_description_en: None,
    }
}

pub fn blog(id: i64, slug: &str, title: &str) -> BlogRecord {
    BlogRecord {
        id,
        slug: slug.to_string(),
        title: title.to_string(),
        content: "<p>Blog içeriği.</p>".to_string(),
        image_url: None,
        created_at: datetime!(2024-03-01 09:00 UTC),
    }
}

pub fn menu(id: i64, slug: &str, name: &str, parent_id: Option<CountryId>) -> CountryMenuRecord {
    CountryMenuRecord {
        id,
        slug: slug.to_string(),
        name: name.to_string(),
        description: None,
        contents: None,
        parent_id,
    }
}

pub fn announcement(id: i64, slug: &str) -> TaxonomyRecord {
    TaxonomyRecord {
        id,
        model_id: id,
        slug: format!("duyuru/{slug}"),
        type_name: "App\\Models\\Announcement".to_string(),
        title: None,
        title_en: None,
        description: None,
        description_en: None,
    }
}

pub fn product(id: i64, country_id: CountryId, name: &str, price: Option<f64>) -> ProductRecord {
    ProductRecord {
        id,
        country_id,
        name: name.to_string(),
        name_en: None,
        description: None,
        description_en: None,
        price,
        currency: "EUR".to_string(),
    }
}

pub fn faq_entry(id: i64, question: &str, answer: &str) -> FaqEntry {
    FaqEntry {
        id,
        question: question.to_string(),
        answers: vec![FaqAnswer {
            id: id + 1000,
            content: answer.to_string(),
        }],
    }
}

/// France with a package, a FAQ entry and a subpage: a fully populated country page.
pub fn catalogue() -> FakeStore {
    let mut store = FakeStore::default();
    let mut fransa = country(1, "fransa", "Fransa");
    fransa.name_en = Some("France".to_string());
    fransa.title_en = Some("France Visa".to_string());
    fransa.country_code = Some("FR".to_string());
    fransa.process_time = Some("15 iş günü".to_string());
    store.countries.push(fransa);
    store.countries.push(country(2, "almanya", "Almanya"));
    store.products.push(product(10, 1, "Turistik Vize Paketi", Some(120.0)));
    store
        .faq
        .insert(1, vec![faq_entry(20, "Vize ücreti ne kadar?", "80 Euro.")]);
    store
        .menus
        .push(menu(30, "fransa-vize-ucreti", "Vize Ücreti", Some(1)));
    store.requirements.push((
        "TR".to_string(),
        VisaRequirementRecord {
            country_code: "FR".to_string(),
            status: Some("Vize gerekli".to_string()),
            allowed_stay: Some("90 gün".to_string()),
            conditions: None,
        },
    ));
    store
}

pub fn site() -> SiteIdentity {
    SiteIdentity::new(PUBLIC_URL, BRAND)
}

pub fn resolver(store: &Arc<FakeStore>, cache: &Arc<PageCache>) -> SlugResolver {
    let content: Arc<dyn ContentRepo> = store.clone();
    let collections: Arc<dyn CountryCollectionsRepo> = store.clone();
    SlugResolver::new(content, collections, Arc::clone(cache), "TR")
}

pub fn page_service(store: &Arc<FakeStore>, cache: &Arc<PageCache>) -> PageService {
    PageService::new(resolver(store, cache), site())
}

pub fn cache() -> Arc<PageCache> {
    Arc::new(PageCache::new(CacheConfig::default()))
}

pub fn http_state(store: &Arc<FakeStore>, cache: &Arc<PageCache>) -> HttpState {
    let health: Arc<dyn HealthProbe> = store.clone();
    HttpState {
        pages: page_service(store, cache),
        cache: Arc::clone(cache),
        health,
    }
}

pub fn admin_state(store: &Arc<FakeStore>, cache: &Arc<PageCache>) -> AdminState {
    let health: Arc<dyn HealthProbe> = store.clone();
    AdminState {
        cache: Arc::clone(cache),
        health,
    }
}
