//! Classification scenarios over realistic module ids.

use chunkwise_core::{AssetCategory, AssetRoute, BundleName, Classifier, ClassifierOptions};
use proptest::prelude::*;

fn classifier() -> Classifier {
    Classifier::new(&ClassifierOptions::default()).unwrap()
}

#[test]
fn known_module_ids() {
    let c = classifier();
    let cases = [
        ("node_modules/react-dom/index.js", Some(BundleName::Vendor)),
        ("node_modules/@fullcalendar/core/index.js", Some(BundleName::CalendarVendor)),
        ("src/apps/dashboard/Home.jsx", Some(BundleName::DashboardApp)),
        ("/srv/web/node_modules/react-router-dom/dist/index.js", Some(BundleName::Vendor)),
        ("node_modules/react-hook-form/dist/index.esm.mjs", Some(BundleName::Vendor)),
        ("node_modules/d3/src/index.js", Some(BundleName::ChartsVendor)),
        ("node_modules/recharts-scale/lib/index.js", Some(BundleName::ChartsVendor)),
        ("node_modules/axios/index.js", Some(BundleName::Vendor)),
        ("src/apps/liff/main.jsx", Some(BundleName::LiffApp)),
        ("src/shared/api/client.js", Some(BundleName::Shared)),
        ("src/App.jsx", None),
        ("index.html", None),
        ("", None),
    ];

    for (id, expected) in cases {
        assert_eq!(c.classify(id), expected, "module id {:?}", id);
    }
}

#[test]
fn package_manager_layouts_attribute_innermost_package() {
    let c = classifier();
    // pnpm virtual store
    assert_eq!(
        c.classify("node_modules/.pnpm/recharts@2.12.0/node_modules/recharts/es6/index.js"),
        Some(BundleName::ChartsVendor)
    );
    // a charting library's own copy of a framework package
    assert_eq!(
        c.classify("node_modules/recharts/node_modules/react-is/index.js"),
        Some(BundleName::Vendor)
    );
    assert_eq!(
        c.classify("node_modules/victory-vendor/node_modules/d3-scale/src/linear.js"),
        Some(BundleName::ChartsVendor)
    );
}

#[test]
fn bundler_decorations_are_ignored() {
    let c = classifier();
    assert_eq!(
        c.classify("\0node_modules/react/jsx-runtime.js?commonjs-proxy"),
        Some(BundleName::Vendor)
    );
    assert_eq!(
        c.classify("C:\\work\\site\\src\\apps\\dashboard\\pages\\Calendar.jsx"),
        Some(BundleName::DashboardApp)
    );
    assert_eq!(
        c.classify("src/shared/styles.css?inline"),
        Some(BundleName::Shared)
    );
}

#[test]
fn subtree_must_contain_the_module() {
    let c = classifier();
    assert_eq!(c.classify("src/apps/dashboard"), None);
    assert_eq!(c.classify("src/apps/dashboardv2/Home.jsx"), None);
    assert_eq!(c.classify("src/shared-utils/index.js"), None);
}

#[test]
fn custom_library_sets() {
    let options = ClassifierOptions {
        charting: vec!["chart.js".to_string(), "echarts*".to_string()],
        calendar: vec!["react-big-calendar".to_string()],
        ..ClassifierOptions::default()
    };
    let c = Classifier::new(&options).unwrap();
    assert_eq!(
        c.classify("node_modules/echarts-for-react/lib/index.js"),
        Some(BundleName::ChartsVendor)
    );
    assert_eq!(
        c.classify("node_modules/react-big-calendar/lib/index.js"),
        Some(BundleName::CalendarVendor)
    );
    assert_eq!(c.classify("node_modules/recharts/index.js"), Some(BundleName::Vendor));
}

#[test]
fn classifier_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Classifier>();

    let c = std::sync::Arc::new(classifier());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = c.clone();
            std::thread::spawn(move || c.classify("node_modules/react/index.js"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(BundleName::Vendor));
    }
}

fn module_id_strategy() -> impl Strategy<Value = String> {
    let segment = "[a-zA-Z0-9_.@-]{1,12}";
    (
        prop::sample::select(vec!["", "/", "node_modules/", "src/apps/", "src/shared/", "\\"]),
        prop::collection::vec(segment, 0..6),
        prop::sample::select(vec!["", ".js", ".jsx", ".css", "?raw"]),
    )
        .prop_map(|(prefix, segments, suffix)| format!("{}{}{}", prefix, segments.join("/"), suffix))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn classification_is_idempotent(id in module_id_strategy()) {
        let c = classifier();
        let first = c.classify(&id);
        prop_assert_eq!(first, c.classify(&id));
        prop_assert_eq!(first, classifier().classify(&id));
    }

    #[test]
    fn batch_matches_sequential(ids in prop::collection::vec(module_id_strategy(), 0..32)) {
        let c = classifier();
        let sequential: Vec<_> = ids.iter().map(|id| c.classify(id)).collect();
        prop_assert_eq!(c.classify_all(&ids), sequential);
    }

    #[test]
    fn explain_agrees_with_classify(id in module_id_strategy()) {
        let c = classifier();
        prop_assert_eq!(c.explain(&id).map(|rule| rule.bundle()), c.classify(&id));
    }

    #[test]
    fn asset_routing_is_total_and_consistent(name in "[a-zA-Z0-9_.-]{0,20}") {
        let route = AssetRoute::for_file_name(&name);
        prop_assert_eq!(route.category, AssetCategory::from_file_name(&name));
        prop_assert_eq!(route.dir, route.category.dir());
        prop_assert!(["images", "fonts", "css", "assets"].contains(&route.dir));
    }
}
