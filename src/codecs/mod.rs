//! The category registry. Each category has a `create` function that writes
//! a symbol's description and a `resolve` function that reads the same frames
//! back, in the same order, against a target compilation.

mod anonymous_type;
mod array_type;
mod local;
mod member;
mod method;
mod named_type;
mod namespace;
mod parameter;
mod pointer_type;
mod tuple_type;
mod type_parameter;

use crate::{
    compilation::Compilation, errors::KeyResult, frame::Category, reader::KeyReader,
    resolution::Resolved, writer::KeyWriter,
};

pub type CreateFn<C> = fn(&<C as Compilation>::Symbol, &mut KeyWriter<'_, C>);
pub type ResolveFn<C> = fn(&mut KeyReader<'_, C>) -> KeyResult<Resolved<<C as Compilation>::Symbol>>;

pub struct Codec<C: Compilation> {
    pub name: &'static str,
    pub create: CreateFn<C>,
    pub resolve: ResolveFn<C>,
}

macro_rules! codec {
    ($module:ident) => {
        Codec {
            name: $module::NAME,
            create: $module::create::<C>,
            resolve: $module::resolve::<C>,
        }
    };
}

pub fn codec_for<C: Compilation>(category: Category) -> Codec<C> {
    match category {
        Category::Namespace => codec!(namespace),
        Category::NamedType => codec!(named_type),
        Category::ArrayType => codec!(array_type),
        Category::PointerType => codec!(pointer_type),
        Category::TupleType => codec!(tuple_type),
        Category::AnonymousType => codec!(anonymous_type),
        Category::TypeParameter => codec!(type_parameter),
        Category::TypeParameterOrdinal => Codec {
            name: type_parameter::ORDINAL_NAME,
            create: type_parameter::create_ordinal::<C>,
            resolve: type_parameter::resolve_ordinal::<C>,
        },
        Category::Field => Codec {
            name: member::FIELD_NAME,
            create: member::create_field::<C>,
            resolve: member::resolve_field::<C>,
        },
        Category::Property => Codec {
            name: member::PROPERTY_NAME,
            create: member::create_property::<C>,
            resolve: member::resolve_property::<C>,
        },
        Category::Method => codec!(method),
        Category::Parameter => codec!(parameter),
        Category::Local => codec!(local),
    }
}

/// Collects, across every container candidate, the members `select` accepts.
pub(crate) fn members_matching<C, F>(
    compilation: &C,
    containers: &[C::Symbol],
    mut select: F,
) -> Vec<C::Symbol>
where
    C: Compilation,
    F: FnMut(&C::Symbol) -> bool,
{
    containers
        .iter()
        .flat_map(|c| compilation.members(c))
        .filter(|m| select(m))
        .collect()
}
