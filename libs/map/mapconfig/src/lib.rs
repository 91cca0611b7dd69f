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
pub mod bound_layer;
pub mod config;
pub mod lifecycle;
pub mod search;
pub mod stack;
pub mod url;
pub mod view;

pub use crate::{
    bound_layer::{prepare_bound_param, resolve_bound_params, PrepareOutcome},
    config::MapConfigData,
    lifecycle::purge_for_map_config_change,
    search::SearchResult,
    stack::resolve_surface_stack,
    url::expand_tile_template,
    view::ViewSpec,
};
