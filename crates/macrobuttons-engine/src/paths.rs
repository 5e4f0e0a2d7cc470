/// Every path prefix of `pathname`, root first.
///
/// `"/a/b/"` yields `["/", "/a", "/a/b"]`. The root is always present.
pub fn enumerate_path_prefixes(pathname: &str) -> Vec<String> {
    let mut prefixes = vec!["/".to_string()];
    let mut current = String::new();
    for segment in pathname.trim_end_matches('/').split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        prefixes.push(current.clone());
    }
    prefixes
}
