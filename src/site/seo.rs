use chrono::{DateTime, Utc};

/// A public page of the site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    pub path: &'static str,
    pub change_freq: &'static str,
    pub priority: f32,
}

/// Public sections in navigation order.
pub const SECTIONS: &[Section] = &[
    Section {
        path: "/",
        change_freq: "weekly",
        priority: 1.0,
    },
    Section {
        path: "/about",
        change_freq: "monthly",
        priority: 0.8,
    },
    Section {
        path: "/work",
        change_freq: "monthly",
        priority: 0.8,
    },
    Section {
        path: "/projects",
        change_freq: "weekly",
        priority: 0.9,
    },
    Section {
        path: "/stack",
        change_freq: "monthly",
        priority: 0.6,
    },
    Section {
        path: "/contact",
        change_freq: "yearly",
        priority: 0.5,
    },
];

/// Paths crawlers are asked to stay out of.
const DISALLOWED: &[&str] = &["/admin"];

fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path == "/" {
        format!("{base}/")
    } else {
        format!("{base}{path}")
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Render an XML sitemap for all sections under `base_url`.
pub fn sitemap_xml(base_url: &str, last_modified: DateTime<Utc>) -> String {
    let lastmod = last_modified.format("%Y-%m-%d").to_string();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for section in SECTIONS {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&join(base_url, section.path)),
            lastmod,
            section.change_freq,
            section.priority,
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render `robots.txt`, pointing crawlers at the sitemap.
pub fn robots_txt(base_url: &str) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED {
        out.push_str(&format!("Disallow: {path}\n"));
    }
    out.push_str(&format!("\nSitemap: {}\n", join(base_url, "/sitemap.xml")));
    out
}
