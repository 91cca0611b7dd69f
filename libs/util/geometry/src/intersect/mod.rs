pub mod sphere_ray;
