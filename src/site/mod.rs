//! Search-engine files for the portfolio's static sections.

pub mod seo;

pub use seo::{SECTIONS, Section, robots_txt, sitemap_xml};
