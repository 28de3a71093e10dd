//! schema.org JSON-LD builders.
//!
//! Each builder returns a standalone object with its own `@context`, so every
//! object can go into its own `<script type="application/ld+json">`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::head::metadata::PageMetadata;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street_address: Option<String>,
    pub locality: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2, e.g. `KE`.
    pub country: String,
}

/// Publisher details for `Organization`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<PostalAddress>,
    #[serde(default)]
    pub area_served: Option<String>,
    #[serde(default)]
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HowToStep {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub currency: String,
    pub value: String,
}

fn insert_opt(obj: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        obj.insert(key.to_string(), Value::String(v.to_string()));
    }
}

pub fn organization(org: &OrganizationInfo) -> Value {
    let mut obj = Map::new();
    obj.insert("@context".into(), SCHEMA_CONTEXT.into());
    obj.insert("@type".into(), "Organization".into());
    obj.insert("name".into(), org.name.clone().into());
    obj.insert("url".into(), org.url.clone().into());
    insert_opt(&mut obj, "logo", org.logo.as_deref());
    insert_opt(&mut obj, "telephone", org.telephone.as_deref());
    insert_opt(&mut obj, "email", org.email.as_deref());
    insert_opt(&mut obj, "areaServed", org.area_served.as_deref());

    if let Some(addr) = &org.address {
        let mut a = Map::new();
        a.insert("@type".into(), "PostalAddress".into());
        insert_opt(&mut a, "streetAddress", addr.street_address.as_deref());
        a.insert("addressLocality".into(), addr.locality.clone().into());
        insert_opt(&mut a, "addressRegion", addr.region.as_deref());
        insert_opt(&mut a, "postalCode", addr.postal_code.as_deref());
        a.insert("addressCountry".into(), addr.country.clone().into());
        obj.insert("address".into(), Value::Object(a));
    }
    if !org.same_as.is_empty() {
        obj.insert("sameAs".into(), json!(org.same_as));
    }
    Value::Object(obj)
}

/// `BreadcrumbList` with 1-based positions in trail order.
pub fn breadcrumb_list(trail: &[Breadcrumb]) -> Value {
    let items: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.name,
                "item": crumb.url,
            })
        })
        .collect();
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

pub fn web_page(meta: &PageMetadata, publisher: Option<&OrganizationInfo>) -> Value {
    let mut page = json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "WebPage",
        "name": meta.title,
        "description": meta.description,
        "url": meta.canonical_url,
        "inLanguage": "en-KE",
    });
    if let (Some(org), Value::Object(obj)) = (publisher, &mut page) {
        obj.insert(
            "publisher".into(),
            json!({ "@type": "Organization", "name": org.name, "url": org.url }),
        );
    }
    page
}

/// `HowTo` whose `step` list mirrors the page's step-by-step content.
pub fn how_to(
    name: &str,
    description: Option<&str>,
    steps: &[HowToStep],
    total_time: Option<&str>,
    estimated_cost: Option<&MonetaryAmount>,
) -> Value {
    let mut obj = Map::new();
    obj.insert("@context".into(), SCHEMA_CONTEXT.into());
    obj.insert("@type".into(), "HowTo".into());
    obj.insert("name".into(), name.into());
    insert_opt(&mut obj, "description", description);
    insert_opt(&mut obj, "totalTime", total_time);
    if let Some(cost) = estimated_cost {
        obj.insert(
            "estimatedCost".into(),
            json!({
                "@type": "MonetaryAmount",
                "currency": cost.currency,
                "value": cost.value,
            }),
        );
    }
    let steps: Vec<Value> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            json!({
                "@type": "HowToStep",
                "position": i + 1,
                "name": step.name,
                "text": step.text,
            })
        })
        .collect();
    obj.insert("step".into(), Value::Array(steps));
    Value::Object(obj)
}

/// `FAQPage` whose `mainEntity` mirrors the page's FAQ list.
pub fn faq_page(faqs: &[Faq]) -> Value {
    let questions: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": faq.answer,
                },
            })
        })
        .collect();
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn firm() -> OrganizationInfo {
        OrganizationInfo {
            name: "Mwangi & Co. Advocates".into(),
            url: "https://example.co.ke".into(),
            logo: None,
            telephone: Some("+254 700 000000".into()),
            email: None,
            address: Some(PostalAddress {
                street_address: None,
                locality: "Nairobi".into(),
                region: None,
                postal_code: None,
                country: "KE".into(),
            }),
            area_served: Some("Kenya".into()),
            same_as: Vec::new(),
        }
    }

    #[test]
    fn organization_omits_unset_fields() {
        let v = organization(&firm());
        assert_eq!(v["@type"], "Organization");
        assert_eq!(v["telephone"], "+254 700 000000");
        assert_eq!(v["address"]["addressCountry"], "KE");
        assert!(v.get("logo").is_none());
        assert!(v["address"].get("postalCode").is_none());
        assert!(v.get("sameAs").is_none());
    }

    #[test]
    fn breadcrumbs_are_positioned() {
        let v = breadcrumb_list(&[
            Breadcrumb {
                name: "Home".into(),
                url: "https://example.co.ke/".into(),
            },
            Breadcrumb {
                name: "Guides".into(),
                url: "https://example.co.ke/guides".into(),
            },
        ]);
        assert_eq!(v["itemListElement"][0]["position"], 1);
        assert_eq!(v["itemListElement"][1]["position"], 2);
        assert_eq!(v["itemListElement"][1]["name"], "Guides");
    }

    #[test]
    fn how_to_mirrors_steps() {
        let steps = vec![
            HowToStep {
                name: "Log in".into(),
                text: "Sign in to eCitizen.".into(),
            },
            HowToStep {
                name: "Pay".into(),
                text: "Pay the filing fee.".into(),
            },
        ];
        let cost = MonetaryAmount {
            currency: "KES".into(),
            value: "1000".into(),
        };
        let v = how_to("File annual returns", None, &steps, Some("PT30M"), Some(&cost));
        assert_eq!(v["step"].as_array().map(Vec::len), Some(2));
        assert_eq!(v["step"][1]["name"], "Pay");
        assert_eq!(v["estimatedCost"]["currency"], "KES");
        assert_eq!(v["totalTime"], "PT30M");
        assert!(v.get("description").is_none());
    }

    #[test]
    fn faq_page_mirrors_questions() {
        let faqs = vec![Faq {
            question: "Q?".into(),
            answer: "A.".into(),
        }];
        let expected = json!({
            "@context": "https://schema.org",
            "@type": "FAQPage",
            "mainEntity": [{
                "@type": "Question",
                "name": "Q?",
                "acceptedAnswer": { "@type": "Answer", "text": "A." }
            }]
        });
        assert_eq!(faq_page(&faqs), expected);
    }

    #[test]
    fn web_page_links_publisher() {
        let meta = PageMetadata::new("T", "D", "https://example.co.ke/t");
        let v = web_page(&meta, Some(&firm()));
        assert_eq!(v["publisher"]["name"], "Mwangi & Co. Advocates");
        assert_eq!(v["url"], "https://example.co.ke/t");
    }
}
