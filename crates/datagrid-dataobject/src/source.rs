//! The DataObject data source driver.

use std::any::{Any, type_name};
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use datagrid_core::options::{FIELDS, LABELS};
use datagrid_core::{
    BindError, Columns, CountError, DataSource, DataSourceOptions, Error, Features, Options,
    Record, Result, SortSpec, Value,
};

use crate::clause::{Limit, OrderBy};
use crate::fields;
use crate::formbuilder::{DefaultFormBuilder, FormBuilder};
use crate::getters::Accessors;
use crate::options::{
    FIELDS_PROPERTY, FORMBUILDER_INTEGRATION, LABELS_PROPERTY, PREDEFINED_ORDER_PROPERTY,
    RAW_COUNT, SORT_PROPERTY, USE_PRIVATE_VARS, default_options,
};
use crate::record_set::RecordSet;

const COUNT_FAILED: &str = "can't count the number of rows";

/// Data source over a bound record set.
///
/// # Example
///
/// ```ignore
/// let mut source = DataObjectSource::<Users>::new();
/// source.bind_object(users, Options::new().with("raw_count", true))?;
///
/// let total = source.count()?;
/// source.sort(SortSpec::with_direction("last_name", SortDirection::Asc))?;
/// let page = source.fetch(0, Some(20))?;
/// ```
pub struct DataObjectSource<R: RecordSet> {
    options: DataSourceOptions,
    bound: Option<Binding<R>>,
    form_builder: Box<dyn FormBuilder>,
}

/// One bound record set and the state derived from it.
struct Binding<R: RecordSet> {
    object: R,
    /// Memoized row count; the record set can't count once fetching started.
    row_count: Option<u64>,
    accessors: Accessors<R>,
    default_sort_applied: bool,
}

/// Frees the record set's result when iteration ends, however it ends.
struct ResultGuard<'a, R: RecordSet> {
    object: &'a mut R,
}

impl<R: RecordSet> Deref for ResultGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.object
    }
}

impl<R: RecordSet> DerefMut for ResultGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.object
    }
}

impl<R: RecordSet> Drop for ResultGuard<'_, R> {
    fn drop(&mut self) {
        tracing::trace!(table = %self.object.table_name(), "Releasing query result");
        self.object.free();
    }
}

impl<R: RecordSet> Default for DataObjectSource<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RecordSet> DataObjectSource<R> {
    /// Create an unbound source with the driver defaults.
    pub fn new() -> Self {
        let mut options = DataSourceOptions::new();
        options.add_default_options(default_options());
        options.set_features(Features { multi_sort: true });
        Self {
            options,
            bound: None,
            form_builder: Box::new(DefaultFormBuilder::new()),
        }
    }

    /// Use a custom renderer for linked records.
    pub fn with_form_builder(mut self, form_builder: impl FormBuilder + 'static) -> Self {
        self.form_builder = Box::new(form_builder);
        self
    }

    /// Bind a record set directly, without a type check.
    pub fn bind_object(&mut self, object: R, options: Options) -> Result<()> {
        if !options.is_empty() {
            self.options.set_options(options);
        }
        self.attach(object);
        Ok(())
    }

    /// Give the bound record set back, leaving the source unbound.
    pub fn unbind(&mut self) -> Option<R> {
        self.bound.take().map(|binding| binding.object)
    }

    /// Whether a record set is bound.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// The bound record set.
    pub fn object(&self) -> Option<&R> {
        self.bound.as_ref().map(|binding| &binding.object)
    }

    /// The bound record set, mutably (to add filters before fetching).
    pub fn object_mut(&mut self) -> Option<&mut R> {
        self.bound.as_mut().map(|binding| &mut binding.object)
    }

    /// The memoized row count, if one was computed for this binding.
    pub fn cached_row_count(&self) -> Option<u64> {
        self.bound.as_ref().and_then(|binding| binding.row_count)
    }

    fn binding_mut(&mut self) -> Result<&mut Binding<R>> {
        self.bound
            .as_mut()
            .ok_or(Error::Bind(BindError::NotBound))
    }

    fn attach(&mut self, object: R) {
        self.release();

        let merged = self.resolve_from_object(&object);
        if !merged.is_empty() {
            self.options.set_options(merged);
        }

        let mut accessors = Accessors::new(R::getters());
        accessors.resolve(&fields::unique(self.options.fields()));

        tracing::debug!(
            table = %object.table_name(),
            fields = ?self.options.fields(),
            "Bound record set"
        );

        self.bound = Some(Binding {
            object,
            row_count: None,
            accessors,
            default_sort_applied: false,
        });
    }

    /// Free the result held by the current binding, if any.
    fn release(&mut self) {
        if let Some(binding) = self.bound.as_mut() {
            if binding.object.has_result() {
                tracing::trace!(table = %binding.object.table_name(), "Releasing previous result");
                binding.object.free();
            }
        }
    }

    /// Fields and labels read from the record set's properties.
    fn resolve_from_object(&self, object: &R) -> Options {
        let mut merged = Options::new();

        if self.options.fields().is_empty() {
            let declared = self
                .options
                .text(FIELDS_PROPERTY)
                .and_then(|property| object.property(property))
                .and_then(fields::names);
            if let Some(mut declared) = declared {
                if self.options.bool(FORMBUILDER_INTEGRATION) {
                    if let Some(order) = object
                        .property(PREDEFINED_ORDER_PROPERTY)
                        .and_then(fields::names)
                    {
                        declared = fields::order_by_predefined(declared, &order);
                    }
                    declared = fields::strip_link_fields(declared);
                }
                merged.insert(FIELDS, declared);
            }
        }

        if self.options.labels().is_none_or(|labels| labels.is_empty()) {
            let declared = self
                .options
                .text(LABELS_PROPERTY)
                .and_then(|property| object.property(property))
                .and_then(|value| value.as_map().cloned());
            if let Some(labels) = declared {
                merged.insert(LABELS, labels);
            }
        }

        merged
    }

    /// Apply the record set's default sort fields, once per binding.
    fn apply_default_sort(&mut self) -> Result<()> {
        let property = self.options.text(SORT_PROPERTY).map(str::to_string);
        let binding = self.binding_mut()?;
        if binding.default_sort_applied {
            return Ok(());
        }
        binding.default_sort_applied = true;

        let Some(sort_fields) = property
            .and_then(|property| binding.object.property(&property))
            .and_then(fields::names)
        else {
            return Ok(());
        };

        tracing::debug!(fields = ?sort_fields, "Applying default sort");
        for field in sort_fields {
            self.sort(SortSpec::field(field))?;
        }
        Ok(())
    }

    /// Count, sort and limit the pending query, then run it.
    ///
    /// Returns the row count for the query. A query the caller already ran
    /// is reused as is.
    fn prepare_query(&mut self, offset: u64, len: Option<u64>) -> Result<u64> {
        let binding = self.binding_mut()?;
        if binding.object.has_result() {
            let rows = binding.object.row_count();
            tracing::debug!(rows, "Query already executed; reusing its row count");
            binding.row_count = Some(rows);
            return Ok(rows);
        }

        let rows = self.count()?;
        self.apply_default_sort()?;

        let binding = self.binding_mut()?;
        // Always sent so a limit from an earlier page never carries over.
        let limit = Limit::for_page(offset, len);
        match &limit {
            Some(limit) => tracing::trace!(limit = %limit.to_sql(), "Limiting query"),
            None => tracing::trace!("Query is not limited"),
        }
        binding.object.limit(limit);
        binding.object.find()?;
        Ok(rows)
    }
}

/// Field names derived from the shape of the first fetched row.
fn derive_fields<R: RecordSet>(object: &R, use_private_vars: bool) -> Vec<String> {
    if use_private_vars {
        object
            .object_vars()
            .into_iter()
            .filter(|name| !fields::is_internal_var(name))
            .collect()
    } else {
        object.to_map().into_iter().map(|(name, _)| name).collect()
    }
}

/// Replace link fields with a description of the record they point at.
fn resolve_links<R: RecordSet>(
    object: &R,
    links: &HashSet<String>,
    form_builder: &dyn FormBuilder,
    record: &mut Record,
) {
    let linked_fields: Vec<String> = record
        .field_names()
        .filter(|name| links.contains(*name))
        .map(str::to_string)
        .collect();

    for field in linked_fields {
        if object.field(&field).is_none() {
            continue;
        }
        match object.get_link(&field) {
            Ok(Some(linked)) => {
                let display = form_builder.data_object_string(linked.as_ref());
                record.set(&field, Value::Text(display));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(field = %field, error = %e, "Failed to load linked record");
            }
        }
    }
}

impl<R: RecordSet> DataSource for DataObjectSource<R> {
    fn bind(&mut self, source: Box<dyn Any>, options: Options) -> Result<()> {
        if !options.is_empty() {
            self.options.set_options(options);
        }

        let object = source.downcast::<R>().map_err(|_| {
            Error::Bind(BindError::TypeMismatch {
                expected: type_name::<R>(),
            })
        })?;
        self.attach(*object);
        Ok(())
    }

    fn count(&mut self) -> Result<u64> {
        let raw_count = self.options.bool(RAW_COUNT);
        let binding = self.binding_mut()?;
        if let Some(rows) = binding.row_count {
            return Ok(rows);
        }

        let executed = binding.object.row_count();
        let rows = if executed != 0 {
            tracing::debug!(rows = executed, "Using row count of the executed query");
            executed
        } else if raw_count {
            tracing::debug!(table = %binding.object.table_name(), "Counting rows with the full query");
            let mut clone = binding.object.clone();
            // Ordering is irrelevant to counting and may reference unselected fields.
            clone.order_by(None);
            let found = clone.find();
            clone.free();
            found.map_err(|e| Error::Count(CountError::with_source(COUNT_FAILED, e)))?
        } else {
            tracing::debug!(table = %binding.object.table_name(), "Counting rows");
            binding
                .object
                .count()
                .map_err(|e| Error::Count(CountError::with_source(COUNT_FAILED, e)))?
        };

        binding.row_count = Some(rows);
        Ok(rows)
    }

    fn fetch(&mut self, offset: u64, len: Option<u64>) -> Result<Vec<Record>> {
        let rows = self.prepare_query(offset, len)?;
        let formbuilder = self.options.bool(FORMBUILDER_INTEGRATION);
        let use_private_vars = self.options.bool(USE_PRIVATE_VARS);

        let Self {
            options,
            bound,
            form_builder,
        } = self;
        let Binding {
            object, accessors, ..
        } = bound
            .as_mut()
            .ok_or(Error::Bind(BindError::NotBound))?;

        let mut cursor = ResultGuard { object };
        if rows == 0 {
            tracing::debug!("Query matched no rows");
            return Ok(Vec::new());
        }

        let links: HashSet<String> = if formbuilder {
            cursor.links().into_iter().collect()
        } else {
            HashSet::new()
        };

        let mut columns: Option<Arc<Columns>> = None;
        let mut records = Vec::new();
        while cursor.fetch()? {
            let shared = match &columns {
                Some(shared) => Arc::clone(shared),
                None => {
                    if options.fields().is_empty() {
                        let derived = derive_fields(&*cursor, use_private_vars);
                        tracing::debug!(fields = ?derived, "Derived fields from the first row");
                        options.set(FIELDS, derived);
                    }
                    let names = fields::unique(options.fields());
                    accessors.resolve(&names);
                    let shared = Arc::new(Columns::new(names));
                    columns = Some(Arc::clone(&shared));
                    shared
                }
            };

            let mut record = Record::with_columns(shared, accessors.read(&*cursor));
            if formbuilder {
                resolve_links(&*cursor, &links, &**form_builder, &mut record);
            }
            tracing::trace!(row = records.len(), "Fetched record");
            records.push(record);
        }

        tracing::debug!(records = records.len(), "Fetch complete");
        Ok(records)
    }

    fn sort(&mut self, spec: SortSpec) -> Result<()> {
        let binding = self.binding_mut()?;
        let object = &mut binding.object;
        if object.has_result() {
            tracing::debug!("Sort requested after the query ran; it applies to the next query");
        }

        let connection = object.connection();
        let clauses: Vec<String> = match &spec {
            SortSpec::Multi(entries) => entries
                .iter()
                .map(|(field, direction)| {
                    OrderBy::new(connection.quote_identifier(field), Some(*direction)).to_sql()
                })
                .collect(),
            SortSpec::Single { field, direction } => {
                vec![OrderBy::new(connection.quote_identifier(field), *direction).to_sql()]
            }
        };

        for clause in &clauses {
            tracing::trace!(clause = %clause, "Adding ORDER BY clause");
            object.order_by(Some(clause));
        }
        Ok(())
    }

    fn options(&self) -> &DataSourceOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut DataSourceOptions {
        &mut self.options
    }
}

impl<R: RecordSet> Drop for DataObjectSource<R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R: RecordSet> std::fmt::Debug for DataObjectSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataObjectSource")
            .field("options", &self.options)
            .field("bound", &self.bound.as_ref().map(|b| b.object.table_name()))
            .field("row_count", &self.cached_row_count())
            .finish_non_exhaustive()
    }
}
