// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use map_core::resource::ResourceState;
use resource_cache::ResourceCache;

/// The map-config-change half of spec §5's `purge`: move the old
/// map-config and (if present) auth-config resources to `Finalizing` so
/// any fetch completion still in flight for them is ignored on arrival
/// and they're evicted on the next pass once nothing touches them again.
///
/// The other half — dropping the traverse tree — is `traversal`'s
/// responsibility (`traversal::Traversal::purge`), since this crate has
/// no notion of a node tree; callers run both on a map-config change.
pub fn purge_for_map_config_change(
    cache: &ResourceCache,
    map_config_name: &str,
    auth_name: Option<&str>,
) {
    cache.get(map_config_name, None).set_state(ResourceState::Finalizing);
    if let Some(name) = auth_name {
        cache.get(name, None).set_state(ResourceState::Finalizing);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use map_core::resource::ResourceState;

    #[test]
    fn test_purge_finalizes_mapconfig_and_auth() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::new(dir.path(), None, 4, 1024, 4).unwrap();
        let cfg = cache.get("file:///mapconfig.json", None);
        let auth = cache.get("token:abc", None);
        cfg.set_state(ResourceState::Ready);
        auth.set_state(ResourceState::Ready);

        purge_for_map_config_change(&cache, "file:///mapconfig.json", Some("token:abc"));

        assert_eq!(cfg.state(), ResourceState::Finalizing);
        assert_eq!(auth.state(), ResourceState::Finalizing);
    }

    #[test]
    fn test_purge_without_auth_only_touches_mapconfig() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::new(dir.path(), None, 4, 1024, 4).unwrap();
        let cfg = cache.get("file:///mapconfig.json", None);
        cfg.set_state(ResourceState::Ready);
        purge_for_map_config_change(&cache, "file:///mapconfig.json", None);
        assert_eq!(cfg.state(), ResourceState::Finalizing);
    }
}
