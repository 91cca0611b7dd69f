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

mod axis_aligned_bounding_box;
mod frustum;
pub mod intersect;
mod obb;
mod plane;
mod ray;
mod sphere;

pub use axis_aligned_bounding_box::Aabb;
pub use frustum::Frustum;
pub use obb::Obb;
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::Sphere;
