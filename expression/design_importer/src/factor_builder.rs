use experiment::characteristic::OntologyTerm;
use experiment::design::ExperimentalDesign;
use experiment::factor::{ExperimentalFactor, FactorType};
use experiment::names::FactorName;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::{DesignFileFormatError, ImportError};
use crate::parser::FactorLine;
use crate::vocabulary::TermLookup;

/// A parsed factor description line: `<name> : Category=<category> Type=<type>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorDeclaration {
    pub line: usize,
    pub name: FactorName,
    pub category: String,
    pub declared_type: String,
}

impl FactorDeclaration {
    pub fn parse(factor_line: &FactorLine) -> Result<Self, DesignFileFormatError> {
        let line = factor_line.line;

        let (name, properties) = match factor_line
            .text
            .split(':')
            .collect::<Vec<_>>()
            .as_slice()
        {
            [name, properties] => (name.trim(), *properties),
            _ => {
                return Err(DesignFileFormatError::InvalidFactorDescription {
                    line,
                    text: factor_line.text.clone(),
                })
            }
        };

        let name: FactorName = name
            .parse()
            .map_err(|cause| DesignFileFormatError::InvalidFactorName {
                line,
                cause,
            })?;

        let properties: Vec<&str> = properties
            .split_whitespace()
            .collect();
        if properties.len() != 2 {
            return Err(DesignFileFormatError::InvalidFactorProperties {
                line,
                reason: format!("expected 'Category=<category>' and 'Type=<type>', found {} properties", properties.len()),
            });
        }

        let mut category: Option<&str> = None;
        let mut declared_type: Option<&str> = None;
        for property in properties {
            let (key, value) = property
                .split_once('=')
                .ok_or_else(|| DesignFileFormatError::InvalidFactorProperties {
                    line,
                    reason: format!("expected '<key>=<value>', found '{}'", property),
                })?;

            if value.is_empty() {
                return Err(DesignFileFormatError::InvalidFactorProperties {
                    line,
                    reason: format!("empty value for '{}'", key),
                });
            }

            let slot = match key.to_lowercase().as_str() {
                "category" => &mut category,
                "type" => &mut declared_type,
                _ => {
                    return Err(DesignFileFormatError::InvalidFactorProperties {
                        line,
                        reason: format!("unknown property '{}'", key),
                    })
                }
            };
            if slot.replace(value).is_some() {
                return Err(DesignFileFormatError::InvalidFactorProperties {
                    line,
                    reason: format!("duplicate property '{}'", key),
                });
            }
        }

        // two distinct known keys were found, so both are present
        match (category, declared_type) {
            (Some(category), Some(declared_type)) => Ok(Self {
                line,
                name,
                category: category.to_string(),
                declared_type: declared_type.to_string(),
            }),
            _ => Err(DesignFileFormatError::InvalidFactorProperties {
                line,
                reason: "expected 'Category' and 'Type'".to_string(),
            }),
        }
    }

    /// The declared type, or [`FactorType::Continuous`] if it is neither categorical nor continuous.
    pub fn factor_type(&self) -> FactorType {
        FactorType::from_declared(&self.declared_type).unwrap_or_else(|| {
            warn!(
                "Unrecognised factor type, treating as continuous. line: {}, factor: '{}', type: '{}'",
                self.line, self.name, self.declared_type
            );
            FactorType::Continuous
        })
    }
}

/// The distinct factors a design file declares, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredFactors {
    factors: IndexMap<FactorName, FactorDeclaration>,
}

impl DeclaredFactors {
    /// When a name is declared more than once the first declaration wins.
    pub fn from_lines(factor_lines: &[FactorLine]) -> Result<Self, DesignFileFormatError> {
        let mut factors: IndexMap<FactorName, FactorDeclaration> = IndexMap::new();

        for factor_line in factor_lines {
            let declaration = FactorDeclaration::parse(factor_line)?;

            if let Some(existing) = factors.get(&declaration.name) {
                warn!(
                    "Factor declared more than once, keeping first declaration. factor: '{}', first: {}, ignored: {}",
                    declaration.name, existing.line, declaration.line
                );
                continue;
            }

            factors.insert(declaration.name.clone(), declaration);
        }

        Ok(Self {
            factors,
        })
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FactorDeclaration> {
        self.factors.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactorDeclaration> {
        self.factors.values()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltFactors {
    pub created: Vec<FactorName>,
    pub reused: Vec<FactorName>,
}

/// Adds every declared factor that the design lacks.
///
/// Every category must resolve to a vocabulary term, even for factors that already exist. An existing factor
/// keeps its category and type; the declaration is discarded.
pub fn build_factors<L: TermLookup + ?Sized>(
    design: &mut ExperimentalDesign,
    declared: &DeclaredFactors,
    lookup: &L,
) -> Result<BuiltFactors, ImportError> {
    let mut built = BuiltFactors::default();

    for declaration in declared.iter() {
        let category = resolve_category(declaration, lookup)?;
        let factor_type = declaration.factor_type();

        if let Some(existing) = design.factor(&declaration.name) {
            if existing.category != category || existing.factor_type != factor_type {
                warn!(
                    "Factor already exists with a different definition, keeping existing. factor: '{}', existing: {} {}, declared: {} {}",
                    existing.name, existing.category, existing.factor_type, category, factor_type
                );
            } else {
                info!("Reusing existing factor. factor: '{}'", existing.name);
            }
            built
                .reused
                .push(declaration.name.clone());
            continue;
        }

        design.add_factor(ExperimentalFactor::new(declaration.name.clone(), category, factor_type))?;
        built
            .created
            .push(declaration.name.clone());
    }

    Ok(built)
}

/// Properties are whitespace-separated, so multi-word labels are written with `_` in place of spaces.
pub const CATEGORY_SPACE: char = '_';

/// Looks up the category label as written, then with every `_` read as a space.
fn resolve_category<L: TermLookup + ?Sized>(
    declaration: &FactorDeclaration,
    lookup: &L,
) -> Result<OntologyTerm, ImportError> {
    if let Some(term) = lookup.find_by_label(&declaration.category)? {
        return Ok(term);
    }

    let spaced = declaration
        .category
        .replace(CATEGORY_SPACE, " ");
    if spaced != declaration.category {
        if let Some(term) = lookup.find_by_label(&spaced)? {
            debug!(
                "Matched category with spaces. factor: '{}', category: '{}', label: '{}'",
                declaration.name, declaration.category, term.label
            );
            return Ok(term);
        }
    }

    Err(ImportError::UnknownCategory {
        factor: declaration.name.clone(),
        category: declaration.category.clone(),
    })
}
