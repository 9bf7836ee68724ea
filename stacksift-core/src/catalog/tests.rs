//! Cross-module tests for the catalog

#[cfg(test)]
mod integration_tests {
    use crate::catalog::{Catalog, CollectionSet, DomainMap, JitterSource, RawEntry, Tag};
    use crate::error::StacksiftError;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled(JitterSource::Disabled).unwrap();
        assert_eq!(catalog.len(), 71);

        let django = catalog.get("lib_0").unwrap();
        assert_eq!(django.name, "Django");
        assert_eq!(django.domain, "Web");
        assert_eq!(django.popularity, 85);
    }

    #[test]
    fn test_bundled_journalism_tags_are_structured() {
        let catalog = Catalog::bundled(JitterSource::Disabled).unwrap();
        let tagged: Vec<_> = catalog
            .iter()
            .filter(|e| e.has_tag(&Tag::journalism()))
            .map(|e| e.name.as_str())
            .collect();

        assert_eq!(tagged.len(), 9);
        assert!(tagged.contains(&"Pandas"));
        assert!(catalog
            .iter()
            .all(|e| !e.description.contains("[JOURNALISM]")));
    }

    #[test]
    fn test_find_by_id_or_name() {
        let catalog = Catalog::bundled(JitterSource::Disabled).unwrap();
        assert_eq!(catalog.find("pandas").unwrap().name, "Pandas");
        assert_eq!(catalog.find("lib_1").unwrap().name, "Flask");
        assert!(matches!(
            catalog.find("cobol-on-rails"),
            Err(StacksiftError::UnknownEntry(_))
        ));
    }

    #[test]
    fn test_full_catalog_facets() {
        let catalog = Catalog::bundled(JitterSource::Disabled).unwrap();
        let facets = catalog.facets();
        assert_eq!(facets.len(), 15);
        assert_eq!(facets.count("Automation"), 12);
        assert_eq!(facets.count("Data Visualization"), 13);
        assert_eq!(facets.categories().next(), Some("Automation"));
    }

    #[test]
    fn test_collections_skip_missing_names() {
        let catalog = Catalog::bundled(JitterSource::Disabled).unwrap();
        let set = CollectionSet::bundled().unwrap();
        let toolkit = set.get("DATA JOURNALISM TOOLKIT").unwrap();

        let members: Vec<_> = catalog
            .iter()
            .filter(|e| toolkit.includes(e))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(members, vec!["Pandas", "Scrapy", "Altair"]);
        assert_eq!(toolkit.unresolved(catalog.entries()).len(), 5);
    }

    #[test]
    fn test_custom_domain_map() {
        let domains = DomainMap::new("Misc").with("Web Frameworks", "Web");
        let catalog = Catalog::from_raw(
            vec![
                RawEntry::new("Flask", "Web Frameworks", "", ""),
                RawEntry::new("Typer", "CLI", "", ""),
            ],
            &domains,
            JitterSource::Disabled,
        );
        assert_eq!(catalog.entries()[1].domain, "Misc");
    }
}
