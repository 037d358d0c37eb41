extern crate geo_vptree;

use std::collections::HashMap;

use geo_vptree::{
    compare_by_distance, BoundingBox, GeospatialPoint, GeospatialPointDatabase, LockingVPTree, MetricItem,
    PointDatabaseMut, SearchCriteria, SimpleGeospatialPoint, VPTree,
};

type Point = SimpleGeospatialPoint;

trait CityDatabase: GeospatialPointDatabase<Point> + PointDatabaseMut<f64, Point> + Default {}

impl<D: GeospatialPointDatabase<Point> + PointDatabaseMut<f64, Point> + Default> CityDatabase for D {}

fn cities() -> HashMap<&'static str, Point> {
    let mut cities = HashMap::new();
    cities.insert("Boston", Point::new(42.338947, -70.919635));
    cities.insert("New York", Point::new(40.780751, -73.977182));
    cities.insert("San Francisco", Point::new(37.766529, -122.39577));
    cities.insert("Los Angeles", Point::new(34.048411, -118.34015));
    cities.insert("Dallas", Point::new(32.787629, -96.79941));
    cities.insert("Chicago", Point::new(41.904667, -87.62504));
    cities.insert("Memphis", Point::new(35.169255, -89.990415));
    cities.insert("Las Vegas", Point::new(36.145303, -115.18358));
    cities.insert("Detroit", Point::new(42.348937, -83.08994));
    cities
}

fn somerville() -> Point {
    Point::new(42.387597, -71.099497)
}

fn named(cities: &HashMap<&'static str, Point>, names: &[&str]) -> Vec<Point> {
    names.iter().map(|name| cities[name]).collect()
}

fn sorted_from(origin: &Point, mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(compare_by_distance(origin));
    points
}

fn populated<D: CityDatabase>() -> (D, HashMap<&'static str, Point>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let cities = cities();
    let mut database = D::default();
    database.add_all(cities.values().copied().collect());
    (database, cities)
}

fn nearest_neighbor<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    assert_eq!(database.nearest_neighbor_filtered(&somerville(), None, None), Some(cities["Boston"]));
}

fn nearest_neighbor_within<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    assert_eq!(
        database.nearest_neighbor_filtered(&somerville(), Some(1000.0 * 1000.0), None),
        Some(cities["Boston"])
    );
    assert_eq!(database.nearest_neighbor_filtered(&Point::new(0.0, 0.0), Some(1000.0 * 1000.0), None), None);
}

fn nearest_neighbor_matching<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let south_of_40 = |p: &Point| p.latitude() < 40.0;

    assert_eq!(database.nearest_neighbor_filtered(&somerville(), None, Some(&south_of_40)), Some(cities["Memphis"]));
}

fn nearest_neighbor_within_matching<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let south_of_40 = |p: &Point| p.latitude() < 40.0;

    assert_eq!(
        database.nearest_neighbor_filtered(&somerville(), Some(2000.0 * 1000.0), Some(&south_of_40)),
        Some(cities["Memphis"])
    );
    assert_eq!(
        database.nearest_neighbor_filtered(&Point::new(0.0, 0.0), Some(2000.0 * 1000.0), Some(&south_of_40)),
        None
    );
}

fn nearest_neighbors<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let nearest = database.nearest_neighbors_filtered(&somerville(), 4, None, None);

    let expected = sorted_from(&somerville(), cities.values().copied().collect());
    assert_eq!(nearest, expected[..4].to_vec());
    assert_eq!(nearest, named(&cities, &["Boston", "New York", "Detroit", "Chicago"]));
}

fn nearest_neighbors_matching<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let west_of_90 = |p: &Point| p.longitude() <= -90.0;

    let nearest = database.nearest_neighbors_filtered(&somerville(), 4, None, Some(&west_of_90));

    let expected = named(&cities, &["San Francisco", "Los Angeles", "Dallas", "Las Vegas"]);
    assert_eq!(nearest, sorted_from(&somerville(), expected));
}

fn nearest_neighbors_within<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let nearest = database.nearest_neighbors_filtered(&somerville(), 4, Some(1000.0 * 1000.0), None);

    let expected = named(&cities, &["Boston", "New York", "Detroit"]);
    assert_eq!(nearest, sorted_from(&somerville(), expected));
    for p in &nearest {
        assert!(somerville().distance(p) < 1000.0 * 1000.0);
    }
}

fn nearest_neighbors_within_matching<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let north_of_42 = |p: &Point| p.latitude() > 42.0;

    let nearest = database.nearest_neighbors_filtered(&somerville(), 4, Some(1000.0 * 1000.0), Some(&north_of_42));

    let expected = named(&cities, &["Boston", "Detroit"]);
    assert_eq!(nearest, sorted_from(&somerville(), expected));
}

fn all_within_distance<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let within = database.all_within_distance_filtered(&somerville(), 1000.0 * 1000.0, None);

    let expected = named(&cities, &["Boston", "New York", "Detroit"]);
    assert_eq!(within, sorted_from(&somerville(), expected));
    for p in &within {
        assert!(somerville().distance(p) < 1000.0 * 1000.0);
    }
}

fn all_within_distance_matching<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let north_of_40 = |p: &Point| p.latitude() > 40.0;

    let within = database.all_within_distance_filtered(&somerville(), 10000.0 * 1000.0, Some(&north_of_40));

    let expected = named(&cities, &["Boston", "New York", "Detroit", "Chicago"]);
    assert_eq!(within, sorted_from(&somerville(), expected));
}

fn bounding_box<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let in_box = database.points_in_bounding_box_filtered(&BoundingBox::new(-90.0, -70.0, 43.0, 40.0), None, None);

    let expected = named(&cities, &["Boston", "New York", "Chicago", "Detroit"]);
    assert_eq!(in_box.len(), expected.len());
    for p in &expected {
        assert!(in_box.contains(p));
    }
}

fn bounding_box_sorted<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let origin = somerville();
    let in_box =
        database.points_in_bounding_box_filtered(&BoundingBox::new(-90.0, -70.0, 43.0, 40.0), Some(&origin), None);

    let expected = named(&cities, &["Boston", "New York", "Chicago", "Detroit"]);
    assert_eq!(in_box, sorted_from(&origin, expected));
}

fn bounding_box_matching<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let boston = cities["Boston"];
    let boston_only = move |p: &Point| *p == boston;

    let bbox = BoundingBox::new(-90.0, -70.0, 43.0, 40.0);
    let in_box = database.points_in_bounding_box_filtered(&bbox, None, Some(&boston_only));
    assert_eq!(in_box, vec![boston]);
}

fn bounding_box_wide_ratio<D: CityDatabase>() {
    let mut database = D::default();
    let northeast = Point::new(45.0, 100.0);
    let southwest = Point::new(-10.0, -100.0);
    database.add(northeast);
    database.add(southwest);

    let in_box = database.points_in_bounding_box_filtered(&BoundingBox::new(-100.0, 100.0, 45.0, -10.0), None, None);
    assert_eq!(in_box.len(), 2);
    assert!(in_box.contains(&northeast));
    assert!(in_box.contains(&southwest));
}

fn bounding_box_antimeridian<D: CityDatabase>() {
    let mut database = D::default();
    let fiji = Point::new(-17.7134, 178.065);
    let samoa = Point::new(-13.759, -172.1046);
    let sydney = Point::new(-33.8688, 151.2093);
    database.add_all(vec![fiji, samoa, sydney]);

    let in_box = database.points_in_bounding_box_filtered(&BoundingBox::new(170.0, -170.0, 0.0, -30.0), None, None);
    assert_eq!(in_box.len(), 2);
    assert!(in_box.contains(&fiji));
    assert!(in_box.contains(&samoa));
}

fn predicate_rejecting_one_point<D: CityDatabase>() {
    let (database, cities) = populated::<D>();
    let boston = cities["Boston"];
    let not_boston = move |p: &Point| *p != boston;

    assert_eq!(database.nearest_neighbor_filtered(&somerville(), None, Some(&not_boston)), Some(cities["New York"]));
    assert_eq!(
        database.nearest_neighbors_filtered(&somerville(), 3, None, Some(&not_boston)),
        named(&cities, &["New York", "Detroit", "Chicago"])
    );
    assert_eq!(
        database.all_within_distance_filtered(&somerville(), 1000.0 * 1000.0, Some(&not_boston)),
        named(&cities, &["New York", "Detroit"])
    );
}

fn iteration<D: CityDatabase>() {
    let mut database = D::default();
    assert_eq!(database.len(), 0);
    assert!(database.to_vec().is_empty());

    let cities = cities();
    database.add_all(cities.values().copied().collect());
    let iterated = database.to_vec();

    assert_eq!(database.len(), iterated.len());
    for p in &iterated {
        assert!(database.contains(p));
    }
    for p in cities.values() {
        assert!(iterated.contains(p));
    }
}

fn size_and_membership<D: CityDatabase>() {
    let mut database = D::default();
    let boston = cities()["Boston"];

    assert_eq!(database.len(), 0);
    assert!(!database.contains(&boston));
    assert!(database.add(boston));
    assert!(database.contains(&boston));
    assert_eq!(database.len(), 1);
    assert!(database.remove(&boston));
    assert!(!database.contains(&boston));
    assert_eq!(database.len(), 0);
}

fn remove<D: CityDatabase>() {
    let (mut database, cities) = populated::<D>();

    assert!(database.remove(&cities["Boston"]));
    assert!(!database.remove(&cities["Boston"]));
    assert_eq!(database.len(), cities.len() - 1);
}

fn remove_all<D: CityDatabase>() {
    let (mut database, cities) = populated::<D>();
    // a second Boston; removing all must leave no copy behind
    database.add(cities["Boston"]);

    let to_remove = named(&cities, &["Boston", "Las Vegas", "Detroit"]);
    assert!(database.remove_all(&to_remove));
    assert!(!database.remove_all(&to_remove));

    for p in &to_remove {
        assert!(!database.contains(p));
    }
    assert_eq!(database.len(), cities.len() - 3);
}

fn retain_all<D: CityDatabase>() {
    let (mut database, cities) = populated::<D>();
    let to_retain = named(&cities, &["Boston", "Chicago", "Dallas", "Memphis"]);

    assert!(database.retain_all(&to_retain));
    assert_eq!(database.len(), to_retain.len());
    for p in &to_retain {
        assert!(database.contains(p));
    }
}

fn clear<D: CityDatabase>() {
    let (mut database, _) = populated::<D>();
    assert!(database.len() > 0);
    database.clear();
    assert_eq!(database.len(), 0);
    assert_eq!(database.nearest_neighbor_filtered(&somerville(), None, None), None);
}

macro_rules! database_tests {
    ($module:ident, $database:ty) => {
        mod $module {
            use super::*;

            #[test]
            fn test_nearest_neighbor() {
                nearest_neighbor::<$database>();
            }

            #[test]
            fn test_nearest_neighbor_within() {
                nearest_neighbor_within::<$database>();
            }

            #[test]
            fn test_nearest_neighbor_matching() {
                nearest_neighbor_matching::<$database>();
            }

            #[test]
            fn test_nearest_neighbor_within_matching() {
                nearest_neighbor_within_matching::<$database>();
            }

            #[test]
            fn test_nearest_neighbors() {
                nearest_neighbors::<$database>();
            }

            #[test]
            fn test_nearest_neighbors_matching() {
                nearest_neighbors_matching::<$database>();
            }

            #[test]
            fn test_nearest_neighbors_within() {
                nearest_neighbors_within::<$database>();
            }

            #[test]
            fn test_nearest_neighbors_within_matching() {
                nearest_neighbors_within_matching::<$database>();
            }

            #[test]
            fn test_all_within_distance() {
                all_within_distance::<$database>();
            }

            #[test]
            fn test_all_within_distance_matching() {
                all_within_distance_matching::<$database>();
            }

            #[test]
            fn test_bounding_box() {
                bounding_box::<$database>();
            }

            #[test]
            fn test_bounding_box_sorted() {
                bounding_box_sorted::<$database>();
            }

            #[test]
            fn test_bounding_box_matching() {
                bounding_box_matching::<$database>();
            }

            #[test]
            fn test_bounding_box_wide_ratio() {
                bounding_box_wide_ratio::<$database>();
            }

            #[test]
            fn test_bounding_box_antimeridian() {
                bounding_box_antimeridian::<$database>();
            }

            #[test]
            fn test_predicate_rejecting_one_point() {
                predicate_rejecting_one_point::<$database>();
            }

            #[test]
            fn test_iteration() {
                iteration::<$database>();
            }

            #[test]
            fn test_size_and_membership() {
                size_and_membership::<$database>();
            }

            #[test]
            fn test_remove() {
                remove::<$database>();
            }

            #[test]
            fn test_remove_all() {
                remove_all::<$database>();
            }

            #[test]
            fn test_retain_all() {
                retain_all::<$database>();
            }

            #[test]
            fn test_clear() {
                clear::<$database>();
            }
        }
    };
}

database_tests!(plain, VPTree<f64, Point>);
database_tests!(locking, LockingVPTree<f64, Point>);

#[test]
fn test_small_node_capacity() {
    // capacity 2 forces several levels for nine cities
    let cities = cities();
    let tree = VPTree::<f64, Point>::from_points(cities.values().copied().collect(), 2).unwrap();
    let somerville = somerville();

    assert_eq!(tree.nearest_neighbor(&somerville), Some(&cities["Boston"]));
    assert_eq!(
        tree.nearest_neighbors(&somerville, 4),
        named(&cities, &["Boston", "New York", "Detroit", "Chicago"]).iter().collect::<Vec<_>>()
    );
    let criteria: &dyn SearchCriteria<Point> = &|p: &Point| p.latitude() < 40.0;
    assert_eq!(tree.nearest_neighbor_filtered(&somerville, None, Some(criteria)), Some(&cities["Memphis"]));
    assert_eq!(tree.iter().count(), 9);
}
