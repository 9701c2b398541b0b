//! Table nodes
//!
//! A table's first child is always its [`Content::TableHeader`]; every other
//! child is a [`Content::TableRow`]. The header is pinned and nothing can be
//! inserted in front of it.

use super::{Content, NodeKind, NodeRef};
use crate::error::{Error, Result};
use crate::tree::{Node, Splice};

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Anything that can become a table cell
#[derive(Debug, Clone)]
pub enum CellData {
    Text(String),
    /// A TableCell is used as is, any other node is wrapped in one
    Node(NodeRef),
}

impl From<&str> for CellData {
    fn from(text: &str) -> Self {
        CellData::Text(text.to_string())
    }
}

impl From<String> for CellData {
    fn from(text: String) -> Self {
        CellData::Text(text)
    }
}

impl From<NodeRef> for CellData {
    fn from(node: NodeRef) -> Self {
        CellData::Node(node)
    }
}

impl CellData {
    fn into_cell(self) -> Result<NodeRef> {
        match self {
            CellData::Node(node) if node.kind() == NodeKind::TableCell => Ok(node),
            CellData::Node(node) => NodeRef::table_cell().with([node]),
            CellData::Text(text) => NodeRef::table_cell().with([NodeRef::text(text)]),
        }
    }
}

fn cells<I, C>(cells: I) -> Result<Vec<NodeRef>>
where
    I: IntoIterator<Item = C>,
    C: Into<CellData>,
{
    cells.into_iter().map(|c| c.into().into_cell()).collect()
}

pub(super) fn check_rows(splice: &Splice<'_, Content>) -> Result<()> {
    let has_header = splice
        .retained
        .first()
        .is_some_and(|row| row.kind() == NodeKind::TableHeader);

    for (i, node) in splice.incoming.iter().enumerate() {
        match node.kind() {
            NodeKind::TableHeader if !has_header && splice.at == 0 && i == 0 => {}
            NodeKind::TableHeader => {
                return Err(Error::InvalidTable("a table has exactly one header, in first position"))
            }
            NodeKind::TableRow if !has_header && splice.at == 0 && i == 0 => {
                return Err(Error::InvalidTable("the first row of a table must be its header"))
            }
            NodeKind::TableRow => {}
            other => {
                return Err(Error::InvalidChild {
                    parent: NodeKind::Table.name(),
                    child: other.name(),
                    accepts: NodeKind::TableRow.name(),
                })
            }
        }
    }
    if has_header && splice.at == 0 && !splice.incoming.is_empty() {
        return Err(Error::InvalidTable("nothing can be inserted before the table header"));
    }
    Ok(())
}

impl NodeRef {
    /// Table whose header is built from column titles
    pub fn table<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header = NodeRef::table_header(columns.into_iter().map(|s| CellData::Text(s.into())))?;
        NodeRef::table_with_header(header)
    }

    pub fn table_with_header(header: NodeRef) -> Result<Self> {
        Node::new(Content::Table).with([header])
    }

    pub fn table_header<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<CellData>,
    {
        Node::new(Content::TableHeader { aligns: Vec::new() }).with(cells(columns)?)
    }

    pub fn table_row<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<CellData>,
    {
        Node::new(Content::TableRow).with(cells(columns)?)
    }

    pub fn table_cell() -> Self {
        Node::new(Content::TableCell)
    }

    /// Append a row built from cell data; returns the new row
    pub fn add_row<I, C>(&self, columns: I) -> Result<NodeRef>
    where
        I: IntoIterator<Item = C>,
        C: Into<CellData>,
    {
        let row = NodeRef::table_row(columns)?;
        self.append([row.clone()])?;
        Ok(row)
    }

    /// Header of a table
    pub fn header(&self) -> Option<NodeRef> {
        if self.kind() != NodeKind::Table {
            return None;
        }
        self.first()
    }

    /// Number of data rows of a table
    pub fn row_count(&self) -> usize {
        match self.kind() {
            NodeKind::Table => self.child_count().saturating_sub(1),
            _ => 0,
        }
    }

    /// Set a column's alignment, on a table or its header
    pub fn set_alignment(&self, column: usize, alignment: Option<Alignment>) -> Result<()> {
        let header = match self.kind() {
            NodeKind::Table => self.header().ok_or(Error::InvalidTable("table has no header"))?,
            NodeKind::TableHeader => self.clone(),
            other => {
                return Err(Error::WrongKind {
                    expected: NodeKind::Table.name(),
                    found: other.name(),
                })
            }
        };
        let mut data = header.data_mut();
        if let Content::TableHeader { aligns } = &mut *data {
            if aligns.len() <= column {
                aligns.resize(column + 1, None);
            }
            aligns[column] = alignment;
        }
        Ok(())
    }

    /// Alignment of each column, padded with `None` up to `columns`
    pub fn alignments(&self, columns: usize) -> Vec<Option<Alignment>> {
        let header = match self.kind() {
            NodeKind::Table => self.header(),
            NodeKind::TableHeader => Some(self.clone()),
            _ => None,
        };
        let mut aligns = header
            .and_then(|h| {
                let data = h.data();
                match &*data {
                    Content::TableHeader { aligns } => Some(aligns.clone()),
                    _ => None,
                }
            })
            .unwrap_or_default();
        aligns.resize(columns.max(aligns.len()), None);
        aligns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BlockType;

    #[test]
    fn test_table_has_header() {
        let table = NodeRef::table(["Name", "Description"]).unwrap();
        let header = table.header().unwrap();
        assert_eq!(header.kind(), NodeKind::TableHeader);
        assert_eq!(header.child_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_table_rejects_formatted_block() {
        let table = NodeRef::table(["Name", "Description"]).unwrap();
        let err = table
            .append([NodeRef::formatted_block(BlockType::Default)])
            .unwrap_err();
        assert!(err.to_string().contains("Table"));
        assert_eq!(table.child_count(), 1);
    }

    #[test]
    fn test_row_requires_table() {
        let block = NodeRef::formatted_block(BlockType::Default);
        let row = NodeRef::table_row(["Abc", "Welcome!"]).unwrap();
        assert!(block.append([row.clone()]).unwrap_err().to_string().contains("TableRow"));
        assert!(row.append([block]).unwrap_err().to_string().contains("TableRow"));
    }

    #[test]
    fn test_cell_requires_row() {
        let block = NodeRef::formatted_block(BlockType::Default);
        let cell = NodeRef::table_cell().with([NodeRef::text("Abc")]).unwrap();
        assert!(block.append([cell]).unwrap_err().to_string().contains("TableCell"));
    }

    #[test]
    fn test_add_row() {
        let table = NodeRef::table(["a", "b"]).unwrap();
        table.add_row(["1", "2"]).unwrap();
        let link = NodeRef::link("x", "https://example.com");
        let row = table
            .add_row([CellData::from(link.clone()), CellData::from("y")])
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(row.index(), Some(2));
        assert_eq!(link.parent().unwrap().kind(), NodeKind::TableCell);
    }

    #[test]
    fn test_header_cannot_be_removed() {
        let table = NodeRef::table(["a"]).unwrap();
        let header = table.header().unwrap();
        assert_eq!(header.remove(), Err(Error::Pinned("TableHeader")));
        let other = NodeRef::table_with_header(NodeRef::table_header(["b"]).unwrap()).unwrap();
        assert!(other.append([header.clone()]).is_err());
        assert!(header.parent().unwrap().ptr_eq(&table));
    }

    #[test]
    fn test_nothing_before_header() {
        let table = NodeRef::table(["a"]).unwrap();
        let row = NodeRef::table_row(["1"]).unwrap();
        assert!(table.prepend([row.clone()]).is_err());
        assert!(table.header().unwrap().before([row.clone()]).is_err());
        table.header().unwrap().after([row.clone()]).unwrap();
        assert_eq!(row.index(), Some(1));
    }

    #[test]
    fn test_second_header_rejected() {
        let table = NodeRef::table(["a"]).unwrap();
        let header = NodeRef::table_header(["b"]).unwrap();
        assert!(matches!(
            table.append([header]),
            Err(Error::InvalidTable(_))
        ));
    }

    #[test]
    fn test_alignment() {
        let table = NodeRef::table(["a", "b", "c"]).unwrap();
        table.set_alignment(2, Some(Alignment::Right)).unwrap();
        assert_eq!(
            table.alignments(3),
            vec![None, None, Some(Alignment::Right)]
        );
        assert!(NodeRef::list(false)
            .set_alignment(0, Some(Alignment::Left))
            .is_err());
    }
}
