use serde::Serialize;
use std::fs;

use crate::project::paths::ProjectPaths;

pub const VIEWS_DIR: &str = "WEB-INF/views";
pub const TAGS_DIR: &str = "WEB-INF/tags";
pub const MVC_CONFIG: &str = "WEB-INF/spring/webmvc-config.xml";
pub const FACES_CONFIG: &str = "WEB-INF/faces-config.xml";

const JSF_POM_MARKERS: [&str; 4] = ["javax.faces", "jakarta.faces", "jsf-api", "primefaces"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Jsf,
}

/// What the availability predicate needs to know about a project.
pub trait ProjectHandle {
    fn is_focused(&self) -> bool;
    /// `rel` is relative to the web root.
    fn webapp_path_exists(&self, rel: &str) -> bool;
    fn is_feature_installed(&self, feature: Feature) -> bool;
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityCheck {
    pub name: &'static str,
    pub passed: bool,
}

pub fn availability_checks(project: Option<&dyn ProjectHandle>) -> Vec<AvailabilityCheck> {
    let Some(project) = project else {
        return vec![AvailabilityCheck {
            name: "project_focused",
            passed: false,
        }];
    };

    vec![
        AvailabilityCheck {
            name: "project_focused",
            passed: project.is_focused(),
        },
        AvailabilityCheck {
            name: "views_dir_present",
            passed: project.webapp_path_exists(VIEWS_DIR),
        },
        AvailabilityCheck {
            name: "jsf_absent",
            passed: !project.is_feature_installed(Feature::Jsf),
        },
        AvailabilityCheck {
            name: "mvc_config_present",
            passed: project.webapp_path_exists(MVC_CONFIG),
        },
        AvailabilityCheck {
            name: "tags_dir_present",
            passed: project.webapp_path_exists(TAGS_DIR),
        },
    ]
}

pub fn is_applicable(project: Option<&dyn ProjectHandle>) -> bool {
    project.is_some() && availability_checks(project).iter().all(|check| check.passed)
}

/// A Maven web project on disk.
#[derive(Debug, Clone)]
pub struct MavenProject {
    paths: ProjectPaths,
}

impl MavenProject {
    pub fn new(paths: ProjectPaths) -> Self {
        Self { paths }
    }

    fn pom_mentions_jsf(&self) -> bool {
        let Ok(pom) = fs::read_to_string(self.paths.root.join("pom.xml")) else {
            return false;
        };
        JSF_POM_MARKERS.iter().any(|marker| pom.contains(marker))
    }
}

impl ProjectHandle for MavenProject {
    fn is_focused(&self) -> bool {
        self.paths.root.join("pom.xml").is_file()
    }

    fn webapp_path_exists(&self, rel: &str) -> bool {
        self.paths.webapp(rel).exists()
    }

    fn is_feature_installed(&self, feature: Feature) -> bool {
        match feature {
            Feature::Jsf => self.paths.webapp(FACES_CONFIG).exists() || self.pom_mentions_jsf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Clone)]
    struct FakeProject {
        focused: bool,
        views: bool,
        jsf: bool,
        mvc_config: bool,
        tags: bool,
    }

    impl FakeProject {
        fn ready() -> Self {
            Self {
                focused: true,
                views: true,
                jsf: false,
                mvc_config: true,
                tags: true,
            }
        }
    }

    impl ProjectHandle for FakeProject {
        fn is_focused(&self) -> bool {
            self.focused
        }

        fn webapp_path_exists(&self, rel: &str) -> bool {
            match rel {
                VIEWS_DIR => self.views,
                MVC_CONFIG => self.mvc_config,
                TAGS_DIR => self.tags,
                _ => false,
            }
        }

        fn is_feature_installed(&self, feature: Feature) -> bool {
            matches!(feature, Feature::Jsf) && self.jsf
        }
    }

    #[test]
    fn applicable_when_every_check_holds() {
        assert!(is_applicable(Some(&FakeProject::ready() as &dyn ProjectHandle)));
    }

    #[test]
    fn absent_project_is_not_applicable() {
        assert!(!is_applicable(None));
    }

    #[test]
    fn each_negated_check_makes_project_inapplicable() {
        let negations: [fn(&mut FakeProject); 5] = [
            |p| p.focused = false,
            |p| p.views = false,
            |p| p.jsf = true,
            |p| p.mvc_config = false,
            |p| p.tags = false,
        ];
        for negate in negations {
            let mut project = FakeProject::ready();
            negate(&mut project);
            assert!(!is_applicable(Some(&project as &dyn ProjectHandle)));
            let failed = availability_checks(Some(&project as &dyn ProjectHandle))
                .into_iter()
                .filter(|check| !check.passed)
                .count();
            assert_eq!(failed, 1);
        }
    }

    fn maven_fixture(root: &std::path::Path) -> ProjectPaths {
        let paths = ProjectPaths::new(root, "src/main/webapp");
        fs::write(root.join("pom.xml"), "<project/>").expect("pom");
        fs::create_dir_all(paths.webapp("WEB-INF/views")).expect("views");
        fs::create_dir_all(paths.webapp("WEB-INF/tags")).expect("tags");
        fs::create_dir_all(paths.webapp("WEB-INF/spring")).expect("spring");
        fs::write(paths.webapp(MVC_CONFIG), "<beans/>").expect("mvc");
        paths
    }

    #[test]
    fn maven_project_on_disk_is_applicable() {
        let tmp = tempdir().expect("tempdir");
        let paths = maven_fixture(tmp.path());
        assert!(is_applicable(Some(&MavenProject::new(paths) as &dyn ProjectHandle)));
    }

    #[test]
    fn faces_config_marks_jsf_installed() {
        let tmp = tempdir().expect("tempdir");
        let paths = maven_fixture(tmp.path());
        fs::write(paths.webapp(FACES_CONFIG), "<faces-config/>").expect("faces");
        let project = MavenProject::new(paths);
        assert!(project.is_feature_installed(Feature::Jsf));
        assert!(!is_applicable(Some(&project as &dyn ProjectHandle)));
    }

    #[test]
    fn jsf_dependency_in_pom_marks_jsf_installed() {
        let tmp = tempdir().expect("tempdir");
        let paths = maven_fixture(tmp.path());
        fs::write(
            tmp.path().join("pom.xml"),
            "<project><dependency><groupId>org.primefaces</groupId><artifactId>primefaces</artifactId></dependency></project>",
        )
        .expect("pom");
        assert!(MavenProject::new(paths).is_feature_installed(Feature::Jsf));
    }
}
