//! Assignment of semantic categories to raw elements based on their tags.

use rayon::prelude::*;

use crate::element::GeoElement;

/// Visual class of a road, derived from the `highway` tag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoadClass {
    /// Footways, paths, cycleways and steps.
    Path,
    /// Service roads and driveways.
    Service,
    /// Residential and living streets.
    Residential,
    /// Streets limited to pedestrians.
    Pedestrian,
    /// Tertiary roads.
    Tertiary,
    /// Secondary roads.
    Secondary,
    /// Primary roads.
    Primary,
    /// Trunk roads.
    Trunk,
    /// Motorways.
    Motorway,
    /// Any other `highway` value.
    Other,
}

impl RoadClass {
    /// Maps a `highway` tag value to a road class. Link roads share the class
    /// of the road they connect to.
    pub fn from_tag(value: &str) -> Self {
        match value {
            "motorway" | "motorway_link" => RoadClass::Motorway,
            "trunk" | "trunk_link" => RoadClass::Trunk,
            "primary" | "primary_link" => RoadClass::Primary,
            "secondary" | "secondary_link" => RoadClass::Secondary,
            "tertiary" | "tertiary_link" => RoadClass::Tertiary,
            "residential" | "living_street" | "unclassified" => RoadClass::Residential,
            "pedestrian" => RoadClass::Pedestrian,
            "service" | "track" => RoadClass::Service,
            "footway" | "path" | "cycleway" | "steps" => RoadClass::Path,
            _ => RoadClass::Other,
        }
    }

    /// Draw order among road classes. Higher priority roads are drawn later,
    /// so a motorway covers a residential street where they cross.
    pub fn draw_priority(&self) -> u8 {
        match self {
            RoadClass::Path => 0,
            RoadClass::Service => 1,
            RoadClass::Other => 2,
            RoadClass::Pedestrian => 3,
            RoadClass::Residential => 4,
            RoadClass::Tertiary => 5,
            RoadClass::Secondary => 6,
            RoadClass::Primary => 7,
            RoadClass::Trunk => 8,
            RoadClass::Motorway => 9,
        }
    }
}

/// Semantic category of a classified element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Part of the road network.
    Road(RoadClass),
    /// Water body or waterway.
    Water,
    /// Metro, light rail or tram line, or a station of one.
    MetroLine,
    /// Point of interest (shop, amenity, tourism).
    Poi,
    /// Building footprint or marker.
    Building,
    /// No classification rule matched. Still rendered with a fallback style.
    Unknown,
}

impl Category {
    /// Key under which style overrides for this category are looked up.
    pub fn style_key(&self) -> &'static str {
        match self {
            Category::Road(_) => "road",
            Category::Water => "water",
            Category::MetroLine => "metro",
            Category::Poi => "poi",
            Category::Building => "building",
            Category::Unknown => "unknown",
        }
    }
}

/// A [`GeoElement`] with its assigned category.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFeature {
    element: GeoElement,
    category: Category,
    subclass: Option<String>,
}

impl ClassifiedFeature {
    /// The wrapped element.
    pub fn element(&self) -> &GeoElement {
        &self.element
    }

    /// Assigned category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Sub-attribute identity used for exact style lookup: the road class tag
    /// value for roads, the line name for metro lines, the shop/amenity kind
    /// for POIs.
    pub fn subclass(&self) -> Option<&str> {
        self.subclass.as_deref()
    }
}

/// One entry of the classification rule table.
struct TagRule {
    /// Tag key that must be present on the element.
    key: &'static str,
    /// If set, the tag value must be one of these.
    values: Option<&'static [&'static str]>,
    /// Builds the category and subclass from the matched element and value.
    classify: fn(&GeoElement, &str) -> (Category, Option<String>),
}

/// Classification rules, evaluated top to bottom. The first matching rule
/// wins, so an element tagged both `highway` and `building` is a road.
const RULES: &[TagRule] = &[
    TagRule {
        key: "highway",
        values: None,
        classify: |_, value| {
            (
                Category::Road(RoadClass::from_tag(value)),
                Some(value.to_string()),
            )
        },
    },
    TagRule {
        key: "natural",
        values: Some(&["water", "bay", "strait", "coastline"]),
        classify: |_, value| (Category::Water, Some(value.to_string())),
    },
    TagRule {
        key: "waterway",
        values: None,
        classify: |_, value| (Category::Water, Some(value.to_string())),
    },
    TagRule {
        key: "railway",
        values: Some(&["subway", "light_rail", "tram", "station", "subway_entrance"]),
        // Metro lines are styled by their name, one color per line.
        classify: |element, _| (Category::MetroLine, element.tag("name").map(str::to_string)),
    },
    TagRule {
        key: "shop",
        values: None,
        classify: |_, value| (Category::Poi, Some(value.to_string())),
    },
    TagRule {
        key: "amenity",
        values: None,
        classify: |_, value| (Category::Poi, Some(value.to_string())),
    },
    TagRule {
        key: "tourism",
        values: None,
        classify: |_, value| (Category::Poi, Some(value.to_string())),
    },
    TagRule {
        key: "building",
        values: None,
        classify: |_, value| {
            let subclass = if value == "yes" {
                None
            } else {
                Some(value.to_string())
            };
            (Category::Building, subclass)
        },
    },
];

/// Assigns a category to an element.
///
/// Classification is total: every element produces exactly one
/// [`ClassifiedFeature`], falling back to [`Category::Unknown`] when no rule
/// matches. Elements are never dropped.
pub fn classify(element: GeoElement) -> ClassifiedFeature {
    for rule in RULES {
        let Some(value) = element.tag(rule.key) else {
            continue;
        };
        if let Some(accepted) = rule.values {
            if !accepted.contains(&value) {
                continue;
            }
        }

        let (category, subclass) = (rule.classify)(&element, value);
        return ClassifiedFeature {
            element,
            category,
            subclass,
        };
    }

    ClassifiedFeature {
        element,
        category: Category::Unknown,
        subclass: None,
    }
}

/// Classifies a batch of elements in parallel, preserving input order.
pub fn classify_all(elements: Vec<GeoElement>) -> Vec<ClassifiedFeature> {
    elements.into_par_iter().map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Geom;
    use crate::latlon;

    fn element(tags: &[(&str, &str)]) -> GeoElement {
        GeoElement::new(
            1,
            Geom::Point(latlon!(48.8566, 2.3522)),
            tags.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn highway_is_road_with_class() {
        let feature = classify(element(&[("highway", "residential")]));
        assert_eq!(feature.category(), Category::Road(RoadClass::Residential));
        assert_eq!(feature.subclass(), Some("residential"));
    }

    #[test]
    fn water_tags() {
        assert_eq!(
            classify(element(&[("natural", "water")])).category(),
            Category::Water
        );
        assert_eq!(
            classify(element(&[("waterway", "river")])).category(),
            Category::Water
        );
        // natural=wood is not water and matches nothing else.
        assert_eq!(
            classify(element(&[("natural", "wood")])).category(),
            Category::Unknown
        );
    }

    #[test]
    fn metro_line_takes_name_as_identity() {
        let feature = classify(element(&[("railway", "subway"), ("name", "Ligne 1")]));
        assert_eq!(feature.category(), Category::MetroLine);
        assert_eq!(feature.subclass(), Some("Ligne 1"));

        let unnamed = classify(element(&[("railway", "subway")]));
        assert_eq!(unnamed.category(), Category::MetroLine);
        assert_eq!(unnamed.subclass(), None);
    }

    #[test]
    fn poi_tags() {
        assert_eq!(
            classify(element(&[("tourism", "museum")])).subclass(),
            Some("museum")
        );
        assert_eq!(
            classify(element(&[("amenity", "cafe")])).category(),
            Category::Poi
        );
        assert_eq!(
            classify(element(&[("shop", "bakery")])).category(),
            Category::Poi
        );
    }

    #[test]
    fn generic_building_has_no_subclass() {
        let feature = classify(element(&[("building", "yes")]));
        assert_eq!(feature.category(), Category::Building);
        assert_eq!(feature.subclass(), None);

        let church = classify(element(&[("building", "church")]));
        assert_eq!(church.subclass(), Some("church"));
    }

    #[test]
    fn unmatched_tags_are_unknown_not_dropped() {
        let feature = classify(element(&[("foo", "bar")]));
        assert_eq!(feature.category(), Category::Unknown);
        assert_eq!(feature.element().tag("foo"), Some("bar"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let feature = classify(element(&[("highway", "primary"), ("building", "yes")]));
        assert_eq!(feature.category(), Category::Road(RoadClass::Primary));
    }

    #[test]
    fn road_priority_ordering() {
        let motorway = RoadClass::from_tag("motorway");
        let residential = RoadClass::from_tag("residential");
        assert!(motorway.draw_priority() > residential.draw_priority());
        assert_eq!(RoadClass::from_tag("primary_link"), RoadClass::Primary);
    }

    #[test]
    fn batch_classification_preserves_order() {
        let elements = vec![
            element(&[("highway", "motorway")]),
            element(&[("natural", "water")]),
            element(&[("foo", "bar")]),
        ];
        let features = classify_all(elements);
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].category(), Category::Road(RoadClass::Motorway));
        assert_eq!(features[1].category(), Category::Water);
        assert_eq!(features[2].category(), Category::Unknown);
    }
}
